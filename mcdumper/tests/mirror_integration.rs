//! Integration tests for the mirror engine.
//!
//! These tests drive complete runs against an in-memory catalog server:
//! - Second run against an unchanged catalog downloads nothing
//! - A failing version does not stop its siblings and is retried later
//! - Missing `server` downloads are skipped
//! - Mapping archives are expanded next to the downloaded zip
//!
//! Run with: `cargo test --test mirror_integration`

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use mcdumper::http::{HttpClient, HttpError};
use mcdumper::mirror::{Mirror, MirrorConfig};
use mcdumper::source::{ArtifactSource, JavaSource, McpSource, McpVersion};

// ============================================================================
// Helper Functions
// ============================================================================

const JAVA_CATALOG: &str = "http://meta.test/mc/game/version_manifest.json";
const MCP_CATALOG: &str = "http://mcp.test/versions.json";
const MCP_BASE: &str = "http://mcp.test";

/// In-memory HTTP server with mutable routes and a request log.
#[derive(Default)]
struct FakeServer {
    routes: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeServer {
    fn route(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.routes.lock().insert(url.to_string(), body.into());
    }

    fn unroute(&self, url: &str) {
        self.routes.lock().remove(url);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

impl HttpClient for FakeServer {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.requests.lock().push(url.to_string());
        self.routes
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Build an in-memory zip archive from `(name, content)` pairs.
fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Serve a jar catalog with three versions; 1.0 has no server jar.
fn serve_java(server: &FakeServer) {
    server.route(
        JAVA_CATALOG,
        r#"{
            "latest": {"release": "1.13", "snapshot": "1.13"},
            "versions": [
                {"id": "1.13", "type": "release", "url": "http://meta.test/v/1.13.json"},
                {"id": "1.12.2", "type": "release", "url": "http://meta.test/v/1.12.2.json"},
                {"id": "1.0", "type": "release", "url": "http://meta.test/v/1.0.json"}
            ]
        }"#,
    );
    for id in ["1.13", "1.12.2"] {
        server.route(
            &format!("http://meta.test/v/{id}.json"),
            format!(
                r#"{{"downloads": {{
                    "client": {{"url": "http://dl.test/{id}/client.jar"}},
                    "server": {{"url": "http://dl.test/{id}/server.jar"}}
                }}}}"#
            ),
        );
        server.route(&format!("http://dl.test/{id}/client.jar"), format!("client {id}"));
        server.route(&format!("http://dl.test/{id}/server.jar"), format!("server {id}"));
    }
    server.route(
        "http://meta.test/v/1.0.json",
        r#"{"downloads": {"client": {"url": "http://dl.test/1.0/client.jar"}}}"#,
    );
    server.route("http://dl.test/1.0/client.jar", "client 1.0");
}

fn mcp_versions() -> Vec<McpVersion> {
    vec![
        McpVersion::new("1.12.2", "stable", "39"),
        McpVersion::new("1.12.2", "snapshot", "20180814"),
        McpVersion::new("1.13", "stable", "43"),
    ]
}

/// Serve a mapping catalog whose releases are JSON numbers, plus archives.
fn serve_mcp(server: &FakeServer) {
    server.route(
        MCP_CATALOG,
        r#"{"1.12.2": {"stable": [39], "snapshot": [20180814]}, "1.13": {"stable": [43]}}"#,
    );
    for version in mcp_versions() {
        let fields = format!("fields of {version}");
        server.route(
            &version.url(MCP_BASE),
            zip_bytes(&[("fields.csv", fields.as_str()), ("docs/README.txt", "mappings")]),
        );
    }
}

fn java_source(root: &Path) -> JavaSource {
    JavaSource::new(root.join("java")).with_manifest_url(JAVA_CATALOG)
}

fn mcp_source(root: &Path) -> McpSource {
    McpSource::new(root.join("mcp"))
        .with_manifest_url(MCP_CATALOG)
        .with_download_base(MCP_BASE)
}

fn manifest_keys<S: ArtifactSource>(
    source: &S,
) -> BTreeSet<<S::Descriptor as mcdumper::source::VersionDescriptor>::Key> {
    source
        .manifest()
        .load(|content| source.decode_manifest(content))
        .unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

/// A second run against an unchanged catalog only fetches the catalog.
#[test]
fn test_second_run_downloads_nothing() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_java(&server);
    let source = java_source(temp.path());
    let mirror = Mirror::new(server.clone());

    let first = mirror.run(&source, &()).unwrap();
    assert_eq!(first.completed.len(), 3);

    server.clear_requests();
    let second = mirror.run(&source, &()).unwrap();

    assert!(second.completed.is_empty());
    assert_eq!(second.already_present, 3);
    assert_eq!(server.requests(), vec![JAVA_CATALOG.to_string()]);
}

/// Files on disk follow the per-version layout.
#[test]
fn test_java_layout_and_missing_server() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_java(&server);
    let source = java_source(temp.path());

    let report = Mirror::new(server.clone()).run(&source, &()).unwrap();

    assert!(report.is_success());
    let root = temp.path().join("java");
    assert_eq!(
        fs::read_to_string(root.join("1.12.2").join("client.jar")).unwrap(),
        "client 1.12.2"
    );
    assert_eq!(
        fs::read_to_string(root.join("1.13").join("server.jar")).unwrap(),
        "server 1.13"
    );
    assert!(root.join("1.0").join("version.json").is_file());
    assert!(root.join("1.0").join("client.jar").is_file());
    assert!(!root.join("1.0").join("server.jar").exists());
    assert!(!server
        .requests()
        .iter()
        .any(|url| url == "http://dl.test/1.0/server.jar"));
}

/// One failing version does not block its concurrently processed siblings,
/// and is picked up by the next run once the server recovers.
#[test]
fn test_partial_failure_is_isolated_and_retried() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_mcp(&server);
    let broken = McpVersion::new("1.12.2", "snapshot", "20180814");
    server.unroute(&broken.url(MCP_BASE));
    let source = mcp_source(temp.path());
    let mirror = Mirror::new(server.clone()).with_parallel_downloads(3);

    let report = mirror.run(&source, &()).unwrap();

    assert_eq!(report.completed, vec!["stable_39-1.12.2", "stable_43-1.13"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].label, broken.to_string());
    let keys = manifest_keys(&source);
    assert_eq!(keys.len(), 2);
    assert!(!keys.contains(&broken));

    // Server recovers; only the failed version is fetched.
    serve_mcp(&server);
    server.clear_requests();
    let retry = mirror.run(&source, &()).unwrap();

    assert_eq!(retry.completed, vec![broken.to_string()]);
    assert_eq!(
        server.requests(),
        vec![MCP_CATALOG.to_string(), broken.url(MCP_BASE)]
    );
    assert_eq!(manifest_keys(&source).len(), 3);
}

/// Mapping archives are kept and their entries expanded beside them.
#[test]
fn test_mcp_archives_expanded() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_mcp(&server);
    let source = mcp_source(temp.path());

    Mirror::new(server).run(&source, &()).unwrap();

    let dir = temp.path().join("mcp").join("1.12.2").join("stable_39");
    assert!(dir.join("mappings.zip").is_file());
    assert_eq!(
        fs::read_to_string(dir.join("fields.csv")).unwrap(),
        "fields of stable_39-1.12.2"
    );
    assert_eq!(
        fs::read_to_string(dir.join("docs").join("README.txt")).unwrap(),
        "mappings"
    );
}

/// The nested manifest uses string releases and loads back identically.
#[test]
fn test_nested_manifest_round_trip() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_mcp(&server);
    let source = mcp_source(temp.path());

    Mirror::new(server)
        .with_parallel_downloads(1)
        .run(&source, &())
        .unwrap();

    let raw: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("mcp").join("versions.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "1.12.2": {"snapshot": ["20180814"], "stable": ["39"]},
            "1.13": {"stable": ["43"]}
        })
    );
    assert_eq!(
        manifest_keys(&source),
        mcp_versions().into_iter().collect::<BTreeSet<_>>()
    );
}

/// A corrupt manifest aborts the source instead of being reset.
#[test]
fn test_corrupt_manifest_aborts_source() {
    let temp = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::default());
    serve_java(&server);
    serve_mcp(&server);
    let config = MirrorConfig::new(temp.path())
        .with_java_manifest_url(JAVA_CATALOG)
        .with_mcp_manifest_url(MCP_CATALOG)
        .with_mcp_download_base(MCP_BASE);
    let java_manifest = temp.path().join("java").join("versions.json");
    fs::create_dir_all(java_manifest.parent().unwrap()).unwrap();
    fs::write(&java_manifest, "{not json").unwrap();

    let outcomes = Mirror::new(server).run_all(&config, &());

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_success(), "mcp should run independently");
    let err = outcomes[1].result.as_ref().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(fs::read_to_string(&java_manifest).unwrap(), "{not json");
}

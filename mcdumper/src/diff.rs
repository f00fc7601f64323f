//! Remote-versus-local version diffing.

use std::collections::BTreeSet;

use crate::source::VersionDescriptor;

/// Descriptors present in `remote` whose key is absent from `local`.
///
/// The result is sorted by key and contains each key at most once, so the
/// processing order is deterministic regardless of catalog order.
pub fn missing<D>(remote: &[D], local: &BTreeSet<D::Key>) -> Vec<D>
where
    D: VersionDescriptor,
{
    let mut seen = BTreeSet::new();
    let mut todo: Vec<D> = remote
        .iter()
        .filter(|d| {
            let key = d.key();
            !local.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect();

    todo.sort_by_key(|d| d.key());
    todo
}

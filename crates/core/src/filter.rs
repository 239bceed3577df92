//! Sorted, filtered view derivation.
//!
//! [`derive_view`] is referentially transparent: the same `(records, filter)`
//! pair always yields the same ordered list, so callers may recompute it on
//! every cache or filter change without memoization.

use crate::registration::Registration;

/// User-controlled view filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Substring to match against section codes; empty means no filtering.
    pub search: String,
}

impl ViewFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
        }
    }
}

/// Compute the display subset: newest first, optionally filtered by a
/// case-insensitive substring match on the section code.
///
/// Ties on `original_created_at` break by descending id so the order is
/// deterministic.
pub fn derive_view(records: &[Registration], filter: &ViewFilter) -> Vec<Registration> {
    let needle = filter.search.trim().to_uppercase();

    let mut view: Vec<Registration> = records
        .iter()
        .filter(|r| needle.is_empty() || r.section_code.to_uppercase().contains(&needle))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        b.original_created_at
            .cmp(&a.original_created_at)
            .then(b.id.cmp(&a.id))
    });

    view
}

//! Well-known identifiers, limits, and identifier-list parsing.
//!
//! The numeric identifiers mirror the values used by the phenotyping database:
//! genotype `0` is the reference (wild-type) line, and QC state `1` marks a
//! context+parameter whose review is complete.

/// Genotype id of the reference (baseline) line.
pub const REFERENCE_GENOTYPE_ID: i64 = 0;

/// QC state id recorded once quality-control review is complete.
pub const DONE_STATE_ID: i64 = 1;

/// Metadata group index for measurements whose blob could not be resolved.
pub const UNRESOLVED_METADATA_INDEX: i64 = -1;

/// Significance threshold used when the caller supplies none or an invalid one.
pub const DEFAULT_PVALUE_THRESHOLD: f64 = 1e-4;

/// Maximum number of genes processed by one export.
pub const MAX_GENES: usize = 20;

/// Maximum number of parameters processed by one export.
pub const MAX_PARAMETERS: usize = 20;

/// Split a comma-separated identifier list.
///
/// Whitespace around commas is ignored and empty items are dropped, so
/// `"MGI:1, MGI:2 ,,MGI:3"` yields three ids. Order is preserved and
/// duplicates are kept; deduplication is the caller's concern.
#[must_use]
pub fn split_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Check whether a parameter or gene key is usable as a query argument.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

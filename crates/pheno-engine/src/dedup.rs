//! Metadata group deduplication.
//!
//! Measurements reference their metadata blob by checksum. Each distinct
//! checksum is resolved once per response and replaced by a compact index
//! into the response's metadata group table.

use std::collections::HashMap;

use pheno_core::entities::{MeasuredValue, MetadataGroupEntry};
use pheno_core::ids::UNRESOLVED_METADATA_INDEX;

use crate::error::EngineError;
use crate::store::MeasurementStore;

/// Assign metadata group indices in a single pass over `measurements`.
///
/// Entries are registered in first-occurrence order starting at 0. A checksum
/// with no stored blob gets no entry, and every measurement carrying it is
/// marked with `-1`. Each checksum is looked up at most once.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if a lookup fails.
pub async fn dedupe_metadata_groups<S: MeasurementStore>(
    store: &S,
    mut measurements: Vec<MeasuredValue>,
) -> Result<(Vec<MetadataGroupEntry>, Vec<MeasuredValue>), EngineError> {
    let mut seen: HashMap<String, i64> = HashMap::new();
    let mut entries = Vec::new();

    for measurement in &mut measurements {
        if let Some(&index) = seen.get(&measurement.metadata_group) {
            measurement.metadata_group_index = index;
            continue;
        }

        let checksum = measurement.metadata_group.clone();
        let index = match store.metadata_group_values(&checksum).await? {
            Some(values) => {
                let index = i64::try_from(entries.len()).unwrap_or(i64::MAX);
                entries.push(MetadataGroupEntry {
                    index,
                    checksum: checksum.clone(),
                    values,
                });
                index
            }
            None => {
                tracing::debug!(checksum = %checksum, "metadata group not found");
                UNRESOLVED_METADATA_INDEX
            }
        };
        measurement.metadata_group_index = index;
        seen.insert(checksum, index);
    }

    Ok((entries, measurements))
}

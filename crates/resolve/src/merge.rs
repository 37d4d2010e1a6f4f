use std::collections::HashSet;

use crate::error::DedupError;
use crate::model::{CandidatePair, Catalog, Record, RecordId};

/// Field-wise merge of two records: keeps `first`'s id and, per field, the
/// lexicographically greater value.
pub fn merge_records(first: &Record, second: &Record) -> Record {
    fn greater(a: &str, b: &str) -> String {
        a.max(b).to_string()
    }

    Record {
        id: first.id,
        name: greater(&first.name, &second.name),
        address: greater(&first.address, &second.address),
        city: greater(&first.city, &second.city),
        phone: greater(&first.phone, &second.phone),
        kind: greater(&first.kind, &second.kind),
    }
}

/// Fold confirmed pairs into the catalog and drop the absorbed records.
///
/// Pairs are applied in the given order, each reading the current state of
/// both records, so a chain `(a, b)` then `(b, c)` merges `c` into `b` after
/// `b` was already scheduled for removal.
pub fn merge_duplicates(catalog: Catalog, pairs: &[CandidatePair]) -> Result<Vec<Record>, DedupError> {
    let (mut records, positions) = catalog.into_parts();
    let mut deleted: HashSet<RecordId> = HashSet::new();

    for pair in pairs {
        let first_pos = *positions
            .get(&pair.id1)
            .ok_or(DedupError::UnknownRecord(pair.id1))?;
        let second_pos = *positions
            .get(&pair.id2)
            .ok_or(DedupError::UnknownRecord(pair.id2))?;

        let merged = merge_records(&records[first_pos], &records[second_pos]);
        records[first_pos] = merged;
        deleted.insert(pair.id2);
    }

    let before = records.len();
    records.retain(|r| !deleted.contains(&r.id));
    log::info!(
        "merge: {} pair(s) applied, {} -> {} records",
        pairs.len(),
        before,
        records.len()
    );

    Ok(records)
}

use std::collections::HashMap;

use crate::config::DetectionConfig;
use crate::metrics::{dice_coefficient, levenshtein, soundex};
use crate::model::{CandidatePair, Catalog, DuplicateAggregate, Record, RecordId, SoundexBlock, Strategy};

/// Run one detection strategy over the whole catalog.
pub fn detect(strategy: Strategy, catalog: &Catalog, config: &DetectionConfig) -> DuplicateAggregate {
    let mut aggregate = DuplicateAggregate::new();
    match strategy {
        Strategy::ExactFields => match_exact_fields(catalog, &mut aggregate),
        Strategy::PhoneExact => match_phone(catalog, &mut aggregate),
        Strategy::FieldMatching => match_field_techniques(catalog, config, &mut aggregate),
    }
    log::info!("{strategy}: {} candidate pair(s)", aggregate.len());
    aggregate
}

/// Upper-triangular scan: every record against every later record.
fn scan_pairs<F>(records: &[Record], mut confirm: F, aggregate: &mut DuplicateAggregate)
where
    F: FnMut(&Record, &Record) -> bool,
{
    for (i, first) in records.iter().enumerate() {
        for second in &records[i + 1..] {
            if confirm(first, second) {
                aggregate.push(CandidatePair::new(first.id, second.id));
            }
        }
    }
}

/// Pair records whose name, address and city are all identical.
pub fn match_exact_fields(catalog: &Catalog, aggregate: &mut DuplicateAggregate) {
    scan_pairs(
        catalog.records(),
        |a, b| a.name == b.name && a.address == b.address && a.city == b.city,
        aggregate,
    );
}

/// Pair records with identical phone numbers.
pub fn match_phone(catalog: &Catalog, aggregate: &mut DuplicateAggregate) {
    scan_pairs(catalog.records(), |a, b| a.phone == b.phone, aggregate);
}

/// Group ids by the soundex code of the record name.
///
/// Blocks come out in order of the first record carrying each code; only
/// codes shared by two or more records produce a block.
pub fn soundex_blocks(catalog: &Catalog) -> Vec<SoundexBlock> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RecordId>> = HashMap::new();

    for record in catalog.records() {
        let code = soundex(&record.name);
        // Catalog ids are unique.
        groups
            .entry(code.clone())
            .or_insert_with(|| {
                order.push(code);
                Vec::new()
            })
            .push(record.id);
    }

    order
        .into_iter()
        .filter_map(|code| {
            let mut ids = groups.remove(&code)?;
            if ids.len() < 2 {
                return None;
            }
            ids.sort_unstable();
            Some(SoundexBlock { code, ids })
        })
        .collect()
}

/// Soundex blocking on the name, followed by a residual full scan.
///
/// Inside a block a pair is confirmed on equal phones and a small name edit
/// distance. The residual scan then catches duplicates whose codes diverged
/// (different first letter, digits in the name) using character-set overlap.
pub fn match_field_techniques(
    catalog: &Catalog,
    config: &DetectionConfig,
    aggregate: &mut DuplicateAggregate,
) {
    let records = catalog.records();
    let blocks = soundex_blocks(catalog);
    log::debug!("soundex: {} block(s) of two or more records", blocks.len());

    for block in &blocks {
        let before = aggregate.len();
        for (i, &first_id) in block.ids.iter().enumerate() {
            let Some(first) = catalog.get(first_id) else {
                continue;
            };
            for &second_id in &block.ids[i + 1..] {
                let Some(second) = catalog.get(second_id) else {
                    continue;
                };
                if first.phone == second.phone
                    && levenshtein(&first.name, &second.name) < config.max_name_distance
                {
                    aggregate.push(CandidatePair::new(first.id, second.id));
                }
            }
        }
        if aggregate.len() > before {
            log::debug!(
                "soundex block {} ({} ids): {} pair(s)",
                block.code,
                block.ids.len(),
                aggregate.len() - before
            );
        }
    }

    let from_blocks = aggregate.len();

    for (i, first) in records.iter().enumerate() {
        for second in &records[i + 1..] {
            let pair = CandidatePair::new(first.id, second.id);
            if aggregate.contains(&pair) {
                continue;
            }
            if first.phone == second.phone
                && dice_coefficient(&first.name, &second.name) > config.min_name_similarity
            {
                aggregate.push(pair);
            }
        }
    }

    log::debug!(
        "field matching: {from_blocks} pair(s) from soundex blocks, {} from residual scan",
        aggregate.len() - from_blocks
    );
}

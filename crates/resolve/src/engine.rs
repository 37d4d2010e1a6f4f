use crate::audit::{audit_records, AuditRules};
use crate::blocking::detect;
use crate::config::DedupConfig;
use crate::error::DedupError;
use crate::evaluate::evaluate;
use crate::merge::merge_duplicates;
use crate::model::{
    Catalog, DedupInput, DedupMeta, DedupResult, DuplicateAggregate, MergeSummary, StrategyReport,
};

/// Run the full pipeline: audit, detect per strategy, evaluate, merge.
pub fn run(config: &DedupConfig, input: DedupInput) -> Result<DedupResult, DedupError> {
    let DedupInput { mut records, gold } = input;

    let audit = if config.audit.enabled {
        let rules = AuditRules::new(&config.audit);
        Some(audit_records(&mut records, &rules))
    } else {
        None
    };

    let catalog = Catalog::new(records)?;
    if gold.is_empty() {
        log::warn!("gold standard is empty; recall cannot be computed");
    }

    let mut reports = Vec::with_capacity(config.detection.strategies.len());
    let mut merge_pairs: Option<DuplicateAggregate> = None;

    for &strategy in &config.detection.strategies {
        let aggregate = detect(strategy, &catalog, &config.detection);
        let evaluation = evaluate(aggregate.pairs(), &gold)?;
        reports.push(StrategyReport {
            strategy,
            detected: aggregate.len(),
            evaluation,
        });
        if strategy == config.detection.merge {
            merge_pairs = Some(aggregate);
        }
    }

    // Only reachable for configs that skipped validate().
    let merge_pairs = match merge_pairs {
        Some(aggregate) => aggregate,
        None => detect(config.detection.merge, &catalog, &config.detection),
    };

    let records_before = catalog.len();
    let records = merge_duplicates(catalog, merge_pairs.pairs())?;

    Ok(DedupResult {
        meta: DedupMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        audit,
        reports,
        merge: MergeSummary {
            strategy: config.detection.merge,
            pairs_applied: merge_pairs.len(),
            records_before,
            records_after: records.len(),
        },
        records,
    })
}

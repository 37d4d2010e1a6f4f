//! `restodup run` / `restodup validate`: config-driven deduplication.

use std::io::Write;
use std::path::{Path, PathBuf};

use restodup_resolve::model::DedupResult;
use restodup_resolve::tsv::{load_gold, load_records, write_records};
use restodup_resolve::{DedupConfig, DedupInput};

use crate::util::{read_file_as_utf8, resolve_relative, source_label};
use crate::CliError;

fn load_config(config_path: &Path) -> Result<DedupConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::args(format!("cannot read config {}: {e}", config_path.display()))
            .with_hint("pass the path to a .dedup.toml file")
    })?;
    DedupConfig::from_toml(&config_str).map_err(CliError::dedup)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "{}: ok ({} strateg{}, merge with {})",
        config.name,
        config.detection.strategies.len(),
        if config.detection.strategies.len() == 1 { "y" } else { "ies" },
        config.detection.merge,
    );
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Input paths are relative to the config file's directory
    let records_path = resolve_relative(&config_path, &config.input.records);
    let gold_path = resolve_relative(&config_path, &config.input.gold);

    let records = load_records(&source_label(&records_path), &read_file_as_utf8(&records_path)?)
        .map_err(CliError::dedup)?;
    let gold = load_gold(&source_label(&gold_path), &read_file_as_utf8(&gold_path)?)
        .map_err(CliError::dedup)?;

    let result = restodup_resolve::run(&config, DedupInput { records, gold })
        .map_err(CliError::dedup)?;

    if let Some(ref out) = config.output.records {
        let path = resolve_relative(&config_path, out);
        write_catalog(&path, &result)?;
        eprintln!("wrote {}", path.display());
    }

    let json_path = output_file.or_else(|| {
        config
            .output
            .json
            .as_deref()
            .map(|p| resolve_relative(&config_path, p))
    });

    if json_output || json_path.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = json_path {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::general(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    if !json_output {
        print!("{}", render_report(&result));
    }

    let m = &result.merge;
    eprintln!(
        "merged {} pair(s) from {}: {} -> {} records",
        m.pairs_applied, m.strategy, m.records_before, m.records_after,
    );

    Ok(())
}

fn write_catalog(path: &Path, result: &DedupResult) -> Result<(), CliError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CliError::general(format!("cannot write {}: {e}", path.display())))?;
    let mut writer = std::io::BufWriter::new(file);
    write_records(&mut writer, &result.records).map_err(CliError::dedup)?;
    writer
        .flush()
        .map_err(|e| CliError::general(format!("cannot write {}: {e}", path.display())))
}

/// Heading per strategy followed by its three metric lines, blank line
/// between strategies.
fn render_report(result: &DedupResult) -> String {
    let blocks: Vec<String> = result
        .reports
        .iter()
        .map(|report| format!("{}\n{}\n", report.strategy.title(), report.evaluation))
        .collect();
    blocks.join("\n")
}

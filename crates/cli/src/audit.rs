//! `restodup audit` / `restodup normalize`: field-value survey and rewrite.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use restodup_resolve::audit::{audit_records, survey_records, AuditRules, SurveyReport};
use restodup_resolve::tsv::{load_records, write_records};

use crate::util::{read_file_as_utf8, source_label};
use crate::CliError;

pub fn cmd_audit(records_path: PathBuf, json_output: bool) -> Result<(), CliError> {
    let data = read_file_as_utf8(&records_path)?;
    let records = load_records(&source_label(&records_path), &data).map_err(CliError::dedup)?;

    let report = survey_records(&records, &AuditRules::default());

    if json_output {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render_survey(&report));
    }
    Ok(())
}

pub fn cmd_normalize(records_path: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let data = read_file_as_utf8(&records_path)?;
    let mut records =
        load_records(&source_label(&records_path), &data).map_err(CliError::dedup)?;

    let summary = audit_records(&mut records, &AuditRules::default());

    match output {
        Some(ref path) => {
            let file = std::fs::File::create(path).map_err(|e| {
                CliError::general(format!("cannot write {}: {e}", path.display()))
            })?;
            let mut writer = std::io::BufWriter::new(file);
            write_records(&mut writer, &records).map_err(CliError::dedup)?;
            writer
                .flush()
                .map_err(|e| CliError::general(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_records(stdout.lock(), &records).map_err(CliError::dedup)?;
        }
    }

    eprintln!(
        "normalized {} record(s): {} name(s), {} street(s), {} cit(ies), {} type(s), {} phone(s) rewritten",
        records.len(),
        summary.names,
        summary.streets,
        summary.cities,
        summary.restaurant_types,
        summary.phones,
    );
    Ok(())
}

fn render_survey(report: &SurveyReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Name qualifiers");
    for (fragment, names) in &report.name_qualifiers {
        let _ = writeln!(out, "  {fragment}");
        for name in names {
            let _ = writeln!(out, "    {name}");
        }
    }

    let _ = writeln!(out, "\nStreet types");
    for (token, addresses) in &report.street_types {
        let _ = writeln!(out, "  {token} ({})", addresses.len());
    }

    let _ = writeln!(out, "\nCities");
    for (city, count) in &report.cities {
        let _ = writeln!(out, "  {city}: {count}");
    }

    let _ = writeln!(out, "\nRestaurant types");
    for (kind, count) in &report.restaurant_types {
        let _ = writeln!(out, "  {kind}: {count}");
    }

    let _ = writeln!(out, "\nPhone separators");
    for (separator, count) in &report.phone_formats {
        let _ = writeln!(out, "  {separator:?}: {count}");
    }

    out
}

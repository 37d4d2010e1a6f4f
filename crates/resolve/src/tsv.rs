//! Tab-separated catalogs and gold lists.

use std::io::Write;

use serde::de::DeserializeOwned;

use crate::error::DedupError;
use crate::model::{CandidatePair, Record};

fn reader(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(data.as_bytes())
}

fn load_rows<T: DeserializeOwned>(source: &str, data: &str) -> Result<Vec<T>, DedupError> {
    let mut rdr = reader(data);
    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize::<T>().enumerate() {
        let row = result.map_err(|e| DedupError::Tsv {
            source: source.to_string(),
            // Header is line 1.
            row: e.position().map(|p| p.line() as usize).unwrap_or(i + 2),
            message: match e.kind() {
                csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
                _ => e.to_string(),
            },
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse a restaurant catalog: header `id name address city phone type`.
pub fn load_records(source: &str, data: &str) -> Result<Vec<Record>, DedupError> {
    let records: Vec<Record> = load_rows(source, data)?;
    log::info!("{source}: loaded {} record(s)", records.len());
    Ok(records)
}

/// Parse the gold standard: header `id1 id2`.
pub fn load_gold(source: &str, data: &str) -> Result<Vec<CandidatePair>, DedupError> {
    let gold: Vec<CandidatePair> = load_rows(source, data)?;
    log::info!("{source}: loaded {} gold pair(s)", gold.len());
    Ok(gold)
}

const HEADER: [&str; 6] = ["id", "name", "address", "city", "phone", "type"];

/// Wrap a text field in quotes, doubling any embedded quote.
fn quote_text(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Write records with a header row. Every text column is quoted, even when
/// its value looks like a number; only `id` is written bare.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<(), DedupError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    wtr.write_record(HEADER.iter().map(|h| quote_text(h)))
        .map_err(|e| DedupError::Io(e.to_string()))?;

    for record in records {
        wtr.write_record([
            record.id.to_string(),
            quote_text(&record.name),
            quote_text(&record.address),
            quote_text(&record.city),
            quote_text(&record.phone),
            quote_text(&record.kind),
        ])
        .map_err(|e| DedupError::Io(e.to_string()))?;
    }
    wtr.flush().map_err(|e| DedupError::Io(e.to_string()))?;
    Ok(())
}

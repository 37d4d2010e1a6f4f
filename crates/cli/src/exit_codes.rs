//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | CLI usage error (bad args, missing config file)           |
//! | 3    | Invalid config (TOML syntax, failed validation)           |
//! | 4    | Input error (unreadable/malformed TSV, bad identifiers)   |
//! | 5    | Undefined metric (zero denominator in precision/recall/F1)|
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map the engine error in `dedup_exit_code`

use restodup_resolve::DedupError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing config file.
pub const EXIT_USAGE: u8 = 2;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Catalog or gold file unreadable or malformed, or record ids not dense.
pub const EXIT_INPUT: u8 = 4;

/// A strategy's precision, recall or F1 has a zero denominator.
pub const EXIT_UNDEFINED_METRIC: u8 = 5;

/// Map an engine error to its exit code.
pub fn dedup_exit_code(err: &DedupError) -> u8 {
    match err {
        DedupError::ConfigParse(_) | DedupError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        DedupError::Tsv { .. }
        | DedupError::InvalidIdentifier { .. }
        | DedupError::UnknownRecord(_) => EXIT_INPUT,
        DedupError::UndefinedMetric { .. } => EXIT_UNDEFINED_METRIC,
        DedupError::Io(_) => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_registry() {
        assert_eq!(dedup_exit_code(&DedupError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
        assert_eq!(
            dedup_exit_code(&DedupError::InvalidIdentifier { position: 0, expected: 1, found: 2 }),
            EXIT_INPUT
        );
        assert_eq!(
            dedup_exit_code(&DedupError::UndefinedMetric { metric: "f1", reason: String::new() }),
            EXIT_UNDEFINED_METRIC
        );
        assert_eq!(dedup_exit_code(&DedupError::Io("disk full".into())), EXIT_ERROR);
    }
}

use std::fmt;

#[derive(Debug)]
pub enum DedupError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty strategy list, bad threshold, etc.).
    ConfigValidation(String),
    /// Malformed tab-separated input.
    Tsv { source: String, row: usize, message: String },
    /// Record identifiers are not dense and 1-based in sequence order.
    InvalidIdentifier { position: usize, expected: u64, found: u32 },
    /// A candidate pair references an identifier absent from the catalog.
    UnknownRecord(u32),
    /// A quality metric whose denominator is zero.
    UndefinedMetric { metric: &'static str, reason: String },
    /// IO error (file read, write, etc.).
    Io(String),
}

impl fmt::Display for DedupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Tsv { source, row, message } => {
                write!(f, "{source}, row {row}: {message}")
            }
            Self::InvalidIdentifier { position, expected, found } => {
                write!(
                    f,
                    "record at position {position} has id {found}, expected {expected} \
                     (ids must be dense and 1-based)"
                )
            }
            Self::UnknownRecord(id) => write!(f, "unknown record id: {id}"),
            Self::UndefinedMetric { metric, reason } => {
                write!(f, "{metric} is undefined: {reason}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for DedupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_identifier_violation() {
        let err = DedupError::InvalidIdentifier { position: 2, expected: 3, found: 7 };
        assert_eq!(
            err.to_string(),
            "record at position 2 has id 7, expected 3 (ids must be dense and 1-based)"
        );
    }

    #[test]
    fn display_undefined_metric() {
        let err = DedupError::UndefinedMetric {
            metric: "precision",
            reason: "no pairs were detected".into(),
        };
        assert_eq!(err.to_string(), "precision is undefined: no pairs were detected");
    }
}

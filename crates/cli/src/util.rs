use std::io::Read;
use std::path::{Path, PathBuf};

use crate::exit_codes::EXIT_INPUT;
use crate::CliError;

/// Read a file as UTF-8, falling back to Windows-1252 for legacy exports.
pub(crate) fn read_file_as_utf8(path: &Path) -> Result<String, CliError> {
    let cannot_read = |e: std::io::Error| CliError {
        code: EXIT_INPUT,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    };

    let mut file = std::fs::File::open(path).map_err(cannot_read)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(cannot_read)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Resolve `path` against the directory holding the config file.
pub(crate) fn resolve_relative(config_path: &Path, path: &str) -> PathBuf {
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    base.join(path)
}

/// Short label for error messages: the file name when there is one.
pub(crate) fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.tsv");
        std::fs::write(&path, "caf\u{e9}").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "caf\u{e9}");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.tsv");
        std::fs::write(&path, b"caf\xe9").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "caf\u{e9}");
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_file_as_utf8(Path::new("/nonexistent/restaurants.tsv")).unwrap_err();
        assert_eq!(err.code, EXIT_INPUT);
        assert!(err.message.contains("restaurants.tsv"));
    }

    #[test]
    fn relative_to_config_dir() {
        let resolved = resolve_relative(Path::new("/data/la/run.dedup.toml"), "restaurants.tsv");
        assert_eq!(resolved, PathBuf::from("/data/la/restaurants.tsv"));
        let bare = resolve_relative(Path::new("run.dedup.toml"), "r.tsv");
        assert_eq!(bare, PathBuf::from("r.tsv"));
    }
}

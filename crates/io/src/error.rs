use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to read a term sheet or booking file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Io { path: PathBuf, message: String },
    UnsupportedFormat(String),
    Csv(String),
    Json(String),
    /// Well-formed document with the wrong structure.
    Shape(String),
}

impl LoadError {
    pub(crate) fn io(path: &Path, err: impl fmt::Display) -> Self {
        LoadError::Io { path: path.to_path_buf(), message: err.to_string() }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            LoadError::UnsupportedFormat(ext) => {
                write!(f, "unsupported booking file format: '{}' (expected .csv or .json)", ext)
            }
            LoadError::Csv(msg) => write!(f, "invalid CSV: {}", msg),
            LoadError::Json(msg) => write!(f, "invalid JSON: {}", msg),
            LoadError::Shape(msg) => write!(f, "unexpected document shape: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Failure to write a report file.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    Io { path: PathBuf, message: String },
    Csv(String),
    Json(String),
}

impl ReportError {
    pub(crate) fn io(path: &Path, err: impl fmt::Display) -> Self {
        ReportError::Io { path: path.to_path_buf(), message: err.to_string() }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io { path, message } => {
                write!(f, "cannot write {}: {}", path.display(), message)
            }
            ReportError::Csv(msg) => write!(f, "CSV report failed: {}", msg),
            ReportError::Json(msg) => write!(f, "JSON report failed: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = LoadError::io(Path::new("/tmp/trades.csv"), "No such file or directory");
        assert_eq!(err.to_string(), "cannot read /tmp/trades.csv: No such file or directory");

        let err = ReportError::io(Path::new("out/report.md"), "Permission denied");
        assert!(err.to_string().starts_with("cannot write out/report.md"));
    }

    #[test]
    fn unsupported_format_lists_expected_extensions() {
        let err = LoadError::UnsupportedFormat("xlsx".into());
        assert!(err.to_string().contains(".csv or .json"));
    }
}

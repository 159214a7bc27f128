use crate::domain::model::RecordKind;
use thiserror::Error;

/// Why a single input line could not become a record.
///
/// Always scoped to one line of one source; the ingestor logs it and moves on.
/// The message names only the reason; `source_name()` and `line()` locate it.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed JSON")]
    Malformed {
        source_name: String,
        line: usize,
        #[source]
        cause: serde_json::Error,
    },

    #[error("expected a JSON object")]
    NotAnObject { source_name: String, line: usize },

    #[error("missing required field `{field}`")]
    MissingField {
        source_name: String,
        line: usize,
        field: &'static str,
    },

    #[error("invalid {kind} record: {message}")]
    InvalidValue {
        source_name: String,
        line: usize,
        kind: RecordKind,
        message: String,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Malformed { line, .. }
            | ParseError::NotAnObject { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidValue { line, .. } => *line,
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            ParseError::Malformed { source_name, .. }
            | ParseError::NotAnObject { source_name, .. }
            | ParseError::MissingField { source_name, .. }
            | ParseError::InvalidValue { source_name, .. } => source_name,
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not allocate an output file in '{directory}' after {attempts} attempts")]
    OutputAllocationError { directory: String, attempts: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) | EtlError::OutputAllocationError { .. } => ErrorCategory::Io,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            EtlError::IoError(_) | EtlError::OutputAllocationError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input files exist and are readable, and that the output directory is writable",
            EtlError::ConfigError { .. } => "Check the logging configuration file",
            EtlError::InvalidConfigValueError { .. } => "Correct the reported command line value",
            EtlError::OutputAllocationError { .. } => "Remove stale result files or choose another output directory",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("File access failed: {}", e),
            EtlError::OutputAllocationError { directory, .. } => {
                format!("Could not create a results file in '{}'", directory)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_location() {
        let err = ParseError::MissingField {
            source_name: "products.txt".to_string(),
            line: 7,
            field: "model",
        };

        assert_eq!(err.line(), 7);
        assert_eq!(err.source_name(), "products.txt");
        assert_eq!(err.to_string(), "missing required field `model`");
    }

    #[test]
    fn test_malformed_keeps_json_cause() {
        use std::error::Error as _;

        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ParseError::Malformed {
            source_name: "listings.txt".to_string(),
            line: 3,
            cause,
        };

        assert_eq!(err.to_string(), "malformed JSON");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = EtlError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));

        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("no such file"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = EtlError::InvalidConfigValueError {
            field: "prefix".to_string(),
            value: "a/b".to_string(),
            reason: "Must be a plain file name without path separators".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}

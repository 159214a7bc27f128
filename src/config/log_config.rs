use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Diagnostics setup, loaded from a TOML file.
///
/// ```toml
/// level = "info"
/// format = "json"
/// file = "logs/product_listing.log"
/// per_line_info = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
    pub file: Option<String>,
    /// Log every successfully processed input line at info level.
    pub per_line_info: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file: None,
            per_line_info: true,
        }
    }
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LogConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings at `path`, or the defaults when no path is given. A file that
    /// cannot be read, parsed or validated yields the defaults plus the error.
    pub fn load_or_default(path: Option<&str>) -> (Self, Option<EtlError>) {
        match path.map(Self::from_file) {
            None => (Self::default(), None),
            Some(Ok(config)) => (config, None),
            Some(Err(e)) => (Self::default(), Some(e)),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("level", &self.level)?;
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(EtlError::InvalidConfigValueError {
                field: "level".to_string(),
                value: self.level.clone(),
                reason: format!("Valid levels: {}", LEVELS.join(", ")),
            });
        }
        if let Some(file) = &self.file {
            validate_path("file", file)?;
        }
        Ok(())
    }
}

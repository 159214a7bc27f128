use crate::config::log_config::{LogConfig, LogFormat};
use crate::utils::error::{EtlError, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(config: &LogConfig, verbose: bool) -> String {
    if verbose {
        "product_listing=debug,info".to_string()
    } else {
        format!("product_listing={},warn", config.level)
    }
}

/// Loads the log config at `path` and installs it. Any failure falls back to
/// debug logging on stderr and is logged. Returns the settings in force.
pub fn setup(path: Option<&str>, verbose: bool) -> LogConfig {
    let (config, load_error) = LogConfig::load_or_default(path);
    let failure = match load_error {
        Some(e) => Some(e),
        None => init_logger(&config, verbose).err(),
    };

    if let Some(e) = failure {
        init_fallback_logger();
        tracing::error!("loading of log config failed: {}", e);
    }
    config
}

/// Subscriber described by `config`, not yet installed.
pub fn build_subscriber(
    config: &LogConfig,
    verbose: bool,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config, verbose)))
        .map_err(|e| EtlError::ConfigError {
            message: format!("invalid log level '{}': {}", config.level, e),
        })?;

    let layer = match &config.file {
        Some(path) => file_layer(config.format, path)?,
        None => stderr_layer(config.format),
    };

    Ok(tracing_subscriber::registry().with(layer).with(filter))
}

/// Installs the global subscriber described by `config`.
pub fn init_logger(config: &LogConfig, verbose: bool) -> Result<()> {
    build_subscriber(config, verbose)?
        .try_init()
        .map_err(|e| EtlError::ConfigError {
            message: format!("logger already initialised: {}", e),
        })
}

/// Debug-level compact logging to stderr, used when the configured setup cannot be loaded.
pub fn init_fallback_logger() {
    let _ = tracing_subscriber::registry()
        .with(stderr_layer(LogFormat::Compact))
        .with(EnvFilter::new("product_listing=debug,info"))
        .try_init();
}

fn stderr_layer(format: LogFormat) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn file_layer(format: LogFormat, path: &str) -> Result<BoxedLayer> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false);

    Ok(match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_directive() {
        let config = LogConfig::default();
        assert_eq!(default_directive(&config, false), "product_listing=info,warn");
        assert_eq!(default_directive(&config, true), "product_listing=debug,info");
    }

    fn log_to(path: &Path, message: &str) {
        let layer = file_layer(LogFormat::Compact, path.to_str().unwrap()).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || tracing::info!("{}", message));
    }

    #[test]
    fn test_file_layer_creates_directories_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("run.log");

        log_to(&path, "first run");
        assert!(dir.path().join("nested").join("logs").is_dir());

        log_to(&path, "second run");
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 2, "got {:?}", lines);
        assert!(lines[0].contains("first run"));
        assert!(lines[1].contains("second run"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_file_layer_json_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");

        let layer = file_layer(LogFormat::Json, path.to_str().unwrap()).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(component = "ingest", "listings.txt: processing of line 2 failed")
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let event: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["message"], "listings.txt: processing of line 2 failed");
        assert_eq!(event["fields"]["component"], "ingest");
    }

    #[test]
    fn test_unusable_log_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let config = LogConfig {
            file: Some(blocker.join("run.log").display().to_string()),
            ..LogConfig::default()
        };

        assert!(matches!(
            build_subscriber(&config, false).err(),
            Some(EtlError::IoError(_))
        ));
        assert!(build_subscriber(&LogConfig::default(), false).is_ok());
    }
}

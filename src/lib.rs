pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, log_config::LogConfig};
pub use core::{etl::EtlEngine, pipeline::MatchPipeline};
pub use utils::diagnostics::{RecordingDiagnostics, TracingDiagnostics};
pub use utils::error::{EtlError, ParseError, Result};

pub mod cli;
pub mod log_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_name, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "product-listing")]
#[command(about = "Attach marketplace listings to catalog products by manufacturer")]
pub struct CliConfig {
    /// Line-delimited JSON file of products
    #[arg(short = 'p', long)]
    pub products_file: String,

    /// Line-delimited JSON file of listings
    #[arg(short = 'l', long)]
    pub listings_file: String,

    /// TOML file describing log level, format and destination
    #[arg(short = 'c', long)]
    pub log_config: Option<String>,

    /// Directory the results file is created in
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: String,

    /// Results file name prefix
    #[arg(long, default_value = "results_file")]
    pub prefix: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log memory and timing at each stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn products_file(&self) -> &str {
        &self.products_file
    }

    fn listings_file(&self) -> &str {
        &self.listings_file
    }

    fn output_prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("products_file", &self.products_file)?;
        validate_path("listings_file", &self.listings_file)?;
        validate_path("output_dir", &self.output_dir)?;
        if let Some(log_config) = &self.log_config {
            validate_path("log_config", log_config)?;
        }
        validate_file_name("prefix", &self.prefix)
    }
}

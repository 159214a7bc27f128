use clap::Parser;
use product_listing::utils::error::ErrorSeverity;
use product_listing::utils::{logger, validation::Validate};
use product_listing::{CliConfig, EtlEngine, LocalStorage, MatchPipeline, TracingDiagnostics};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    let log_config = logger::setup(config.log_config.as_deref(), config.verbose);

    tracing::info!("Starting product-listing");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    let storage = LocalStorage::new(config.output_dir.clone());
    let diagnostics =
        TracingDiagnostics::new("pipeline").with_per_line_info(log_config.per_line_info);
    let pipeline = MatchPipeline::new(storage, config, diagnostics);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            // stdout carries only the results path so callers can capture it
            println!("{}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

use clap::Parser;
use silo_harvest::domain::catalog;
use silo_harvest::utils::error::{ErrorSeverity, HarvestError};
use silo_harvest::utils::{logger, validation::Validate};
use silo_harvest::{CliConfig, HttpFetchService, LocalStorage, RetrievalOrchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.list_layers {
        let dataset = catalog::dataset();
        println!(
            "{} ({}, {}°, from {})",
            dataset.title, dataset.crs, dataset.resolution_degrees, dataset.first_year
        );
        for layer in catalog::layers() {
            println!("{:<22} {} ({})", layer.name, layer.title, layer.units);
        }
        return Ok(());
    }
    if config.license {
        println!("{}", serde_json::to_string_pretty(&catalog::license())?);
        return Ok(());
    }

    tracing::info!("Starting silo-harvest");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let request = config.download_request()?;
    let fetcher = HttpFetchService::new(LocalStorage::default(), config.source_settings())?;
    let orchestrator = RetrievalOrchestrator::new_with_monitoring(fetcher, config.monitor)
        .with_policy(config.failure_policy());

    match orchestrator.retrieve_with_report(&request).await {
        Ok(report) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&report.paths)?);
            } else {
                for path in &report.paths {
                    println!("{}", path.display());
                }
            }

            if report.is_complete() {
                tracing::info!("✅ Download completed: {} file(s)", report.paths.len());
            } else {
                for failure in &report.failures {
                    eprintln!("❌ {}: {}", failure.layer, failure.error.user_friendly_message());
                }
                let worst = report
                    .failures
                    .iter()
                    .map(|f| f.error.severity())
                    .max()
                    .unwrap_or(ErrorSeverity::High);
                std::process::exit(exit_code(worst));
            }
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

fn report_failure(e: &HarvestError) -> ! {
    tracing::error!(
        "❌ Download failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(exit_code(e.severity()));
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2, // worth retrying
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

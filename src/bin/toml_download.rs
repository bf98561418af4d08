use clap::Parser;
use silo_harvest::config::toml_config::TomlConfig;
use silo_harvest::core::orchestrator::layer_out_path;
use silo_harvest::utils::error::ErrorSeverity;
use silo_harvest::utils::{logger, validation::Validate};
use silo_harvest::{
    HttpFetchService, LocalStorage, PlanningFetchService, RetrievalOrchestrator,
};

#[derive(Parser)]
#[command(name = "toml-download")]
#[command(about = "Download SILO rasters described by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "silo-download.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be downloaded without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based download");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let request = config.download_request();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be downloaded");
        let planner = PlanningFetchService::new(config.source.clone());
        RetrievalOrchestrator::new(&planner).retrieve(&request).await?;

        println!("🔍 Planned downloads:");
        for planned in planner.planned() {
            println!("  {} {} -> {}", planned.layer, planned.year, planned.target.display());
            println!("    {}", planned.url);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let fetcher = HttpFetchService::new(LocalStorage::default(), config.source.clone())?;
    let orchestrator = RetrievalOrchestrator::new_with_monitoring(fetcher, monitor_enabled)
        .with_policy(config.failure_policy());

    match orchestrator.retrieve_with_report(&request).await {
        Ok(report) => {
            println!("✅ Downloaded {} file(s)", report.paths.len());
            for path in &report.paths {
                println!("📁 {}", path.display());
            }
            if !report.is_complete() {
                for failure in &report.failures {
                    tracing::error!("❌ Layer '{}' failed: {}", failure.layer, failure.error);
                    eprintln!("❌ {}: {}", failure.layer, failure.error.user_friendly_message());
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Download failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let download = &config.download;
    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.source.base_url);
    println!("  Layers: {}", download.layers.as_slice().join(", "));
    println!(
        "  Years: {}",
        download
            .years
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  BBox: {}", config.bounding_box().to_query_value());
    println!("  Format: {}", download.format);
    println!("  Delete temp files: {}", download.delete_temp);
    println!("  On layer failure: {:?}", config.failure_policy());
    for layer in download.layers.iter() {
        println!("  Output: {}", layer_out_path(&download.out_path, layer));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

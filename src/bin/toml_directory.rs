use anyhow::Context;
use clap::Parser;
use contact_directory::core::ConfigProvider;
use contact_directory::utils::{logger, validation::Validate};
use contact_directory::{DirectoryEngine, DirectoryPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-directory")]
#[command(about = "Build the contact directory from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "directory.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Show what would be processed without reading or writing any contacts
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    let verbose = args.verbose || config.log_level() == Some("debug");
    logger::init_logger(verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based contact directory");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code().max(1));
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = DirectoryPipeline::new(LocalStorage::default(), config);
    let engine = DirectoryEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(output_path) => {
            tracing::info!("✅ Contact directory written to {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Title: {}", config.title());
    println!("  Sources: {}", config.input_files().len());
    println!("  Output: {}", config.output_path());
    println!(
        "  Steps: {}",
        config
            .format_steps()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📄 Sources:");
    if config.input_files().is_empty() {
        println!("  (none) - the directory will be empty");
    }
    for file in config.input_files() {
        let status = if std::path::Path::new(file).exists() {
            "found"
        } else {
            "missing, will be skipped"
        };
        println!("  {} ({})", file, status);
    }
    println!(
        "  Delimiter: {:?}, header line: {}",
        config.delimiter(),
        if config.has_header() { "yes" } else { "no" }
    );

    println!();
    println!("💾 Outputs:");
    println!("  HTML: {}", config.output_path());
    if let Some(path) = config.stats_json_path() {
        println!("  Statistics JSON: {}", path);
    }
    if let Some(path) = config.export_csv_path() {
        println!("  Unique contacts CSV: {}", path);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}

use anyhow::{anyhow, Context, Result};
use appkit::db::DbConnConfig;
use appkit::runtime::{run, RunOptions, ShutdownOptions};
use appkit::ModuleRegistry;
use clap::{Parser, Subcommand};
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// Adapter to make AppConfigProvider implement appkit::ConfigProvider
struct AppkitConfigAdapter(Arc<AppConfigProvider>);

impl appkit::ConfigProvider for AppkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// PlantCare Server - houseplant collections and watering schedules
#[derive(Parser)]
#[command(name = "plantcare-server")]
#[command(about = "PlantCare Server - houseplant collections and watering schedules")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Import (or re-import) the plant catalog from a CSV file
    ImportPlants {
        /// Waterwise plants CSV export
        #[arg(long)]
        csv: PathBuf,
    },
    /// Update catalog image locations by botanical name from a CSV file
    UpdatePlantImages {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized (absolute, created) while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("PlantCare Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
        Commands::ImportPlants { csv } => import_plants(config, &csv).await,
        Commands::UpdatePlantImages { csv } => update_plant_images(config, &csv).await,
    }
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database URL not configured"))?;
    if db_config.url.trim().is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    appkit::db::connect(
        &DbConnConfig {
            url: db_config.url.trim().to_string(),
            max_conns: db_config.max_conns,
            busy_timeout_ms: db_config.busy_timeout_ms,
        },
        Path::new(&config.server.home_dir),
    )
    .await
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let raw = format!("{}:{}", config.server.host, config.server.port);
    raw.parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let bind_addr = bind_addr(&config)?;

    tracing::info!("Initializing modules...");
    let config_provider = Arc::new(AppkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config.clone(),
    ))));

    let db = connect_db(&config).await?;

    // accounts first: plant_care's routes authenticate through its client
    let registry = ModuleRegistry::new()
        .with_full_module(Arc::new(accounts::Accounts::default()))
        .with_full_module(Arc::new(plant_care::PlantCare::default()));

    run(RunOptions {
        registry,
        modules_cfg: config_provider,
        db: Some(db),
        home_dir: PathBuf::from(&config.server.home_dir),
        bind_addr,
        request_timeout: Some(Duration::from_secs(config.server.timeout_sec)),
        shutdown: ShutdownOptions::Signals,
    })
    .await
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    bind_addr(&config)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn import_plants(config: AppConfig, csv: &Path) -> Result<()> {
    let db = connect_db(&config).await?;
    let summary = plant_care::import::import_catalog_file(&db, csv).await?;
    tracing::info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "Catalog import finished"
    );
    println!(
        "Imported {} plants ({} new, {} updated)",
        summary.inserted + summary.updated,
        summary.inserted,
        summary.updated
    );
    db.close().await?;
    Ok(())
}

async fn update_plant_images(config: AppConfig, csv: &Path) -> Result<()> {
    let db = connect_db(&config).await?;
    let summary = plant_care::import::refresh_catalog_images_file(&db, csv).await?;
    for name in &summary.skipped {
        println!("Plant {name} not found, skipping");
    }
    println!("Updated {} image locations", summary.updated);
    db.close().await?;
    Ok(())
}

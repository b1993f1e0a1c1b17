//! # UGV Mission Dashboard
//!
//! Binary entry point: print a dashboard report or serve it over HTTP.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ugv_analytics::MissionDataset;
use ugv_dashboard::{AppState, Config, FilterSelection, build_router};

#[derive(Parser, Debug)]
#[command(name = "ugv-dashboard")]
#[command(about = "UGV mission dashboard over a CSV mission log", version)]
struct Cli {
    /// Mission dataset CSV (overrides DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard for one filter selection
    Report(ReportArgs),
    /// Serve the dashboard API
    Serve {
        /// Bind address (overrides SERVER_ADDR)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
    /// Terrain label to include; repeat for several. Defaults to every terrain.
    #[arg(long = "terrain")]
    terrains: Vec<String>,

    /// Exclude every terrain
    #[arg(long, conflicts_with = "terrains")]
    no_terrain: bool,

    /// Lowest battery level included
    #[arg(long)]
    battery_min: Option<f64>,

    /// Highest battery level included
    #[arg(long)]
    battery_max: Option<f64>,

    /// all, success-only or failure-only
    #[arg(long, default_value = "all")]
    success: String,

    /// Chart color scheme (overrides COLOR_THEME)
    #[arg(long)]
    theme: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

impl ReportArgs {
    fn selection(&self) -> FilterSelection {
        let terrains = if self.no_terrain {
            Some(Vec::new())
        } else if self.terrains.is_empty() {
            None
        } else {
            Some(self.terrains.clone())
        };

        FilterSelection {
            terrains,
            battery_min: self.battery_min,
            battery_max: self.battery_max,
            success: Some(self.success.clone()),
            theme: self.theme.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command {
        Command::Report(args) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config))
                .with_writer(std::io::stderr)
                .init();

            let dataset = load_dataset(&config)?;
            let (filter, theme) = args.selection().resolve(&dataset, config.color_theme)?;
            match args.format {
                Format::Json => println!("{}", dataset.generate_report_json(&filter, theme)?),
                Format::Markdown => print!("{}", dataset.generate_report_markdown(&filter, theme)),
            }
        }
        Command::Serve { addr } => {
            tracing_subscriber::registry()
                .with(env_filter(&config))
                .with(tracing_subscriber::fmt::layer().json())
                .init();

            tracing::info!(version = ugv_dashboard::VERSION, "Starting UGV Mission Dashboard API");

            let dataset = load_dataset(&config)?;
            let state = AppState::new(dataset, config.color_theme);
            let app = build_router(state, &config.cors_origins);

            let addr = addr.unwrap_or(config.server_addr);
            tracing::info!(%addr, "Starting HTTP server");

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server shut down gracefully");
        }
    }

    Ok(())
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into())
}

fn load_dataset(config: &Config) -> anyhow::Result<MissionDataset> {
    MissionDataset::load(&config.data_path)
        .with_context(|| format!("loading mission dataset {}", config.data_path.display()))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

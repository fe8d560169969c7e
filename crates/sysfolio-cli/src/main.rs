use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "sysfolio")]
#[command(about = "SYSFOLIO CLI - portfolio terminal and synthetic telemetry simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run terminal command lines and print their output
    Exec {
        /// One command line per argument, e.g. `"ping api-gateway"`
        #[arg(required = true)]
        lines: Vec<String>,
        /// Print the resulting records as JSON
        #[arg(long)]
        json: bool,
        /// Seed for reproducible ping latencies
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a simulated load test against a service
    Loadtest {
        /// Service id, e.g. `api-gateway`
        #[arg(long)]
        service: String,
        /// Concurrent users (10-500)
        #[arg(long)]
        users: Option<u32>,
        /// Test duration in seconds (10-120)
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Milliseconds between samples
        #[arg(long)]
        tick_millis: Option<u64>,
        /// Emit events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Stream simulated logs for a service
    Logs {
        #[arg(long)]
        service: String,
        /// all, info, req, res, warn or error
        #[arg(long, default_value = "all")]
        filter: String,
        /// Case-insensitive text to match
        #[arg(long, default_value = "")]
        search: String,
        /// Number of stream ticks to run
        #[arg(long, default_value_t = 10)]
        ticks: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the filtered view to a dated `.log` file in this directory
        #[arg(long)]
        export: Option<std::path::PathBuf>,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SYSFOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec { lines, json, seed } => commands::exec::run(&lines, json, seed)?,
        Commands::Loadtest {
            service,
            users,
            duration,
            seed,
            tick_millis,
            json,
        } => {
            commands::loadtest::run(commands::loadtest::LoadTestArgs {
                service,
                users,
                duration,
                seed,
                tick_millis,
                json,
            })
            .await?
        }
        Commands::Logs {
            service,
            filter,
            search,
            ticks,
            seed,
            export,
        } => {
            commands::logs::run(commands::logs::LogsArgs {
                service,
                filter,
                search,
                ticks,
                seed,
                export,
            })
            .await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show()?,
            ConfigAction::Path => commands::config::path()?,
        },
    }

    Ok(())
}

//! Volta daemon — entry point for running a Volta node.

use clap::Parser;
use std::path::PathBuf;
use volta_node::NodeConfig;

#[derive(Parser)]
#[command(name = "volta-daemon", about = "Volta protocol node daemon")]
struct Cli {
    /// Data directory for chain storage.
    #[arg(long, env = "VOLTA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Consensus transport port.
    #[arg(long, env = "VOLTA_CONSENSUS_PORT")]
    consensus_port: Option<u16>,

    /// Maximum delegates elected per epoch.
    #[arg(long, env = "VOLTA_DELEGATE_SIZE")]
    delegate_size: Option<u32>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "VOLTA_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the node.
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    volta_node::init_tracing();

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => match NodeConfig::from_toml_file(path) {
            Ok(cfg) => {
                tracing::info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!("failed to load config file: {e}, using defaults");
                NodeConfig::default()
            }
        },
        None => NodeConfig::default(),
    };

    let config = NodeConfig {
        data_dir: cli.data_dir.unwrap_or(base.data_dir),
        consensus_port: cli.consensus_port.unwrap_or(base.consensus_port),
        delegate_size: cli.delegate_size.unwrap_or(base.delegate_size),
        log_level: cli.log_level,
        ..base
    };

    match cli.command {
        Command::Node { action } => match action {
            NodeAction::Run => {
                tracing::info!(
                    "starting Volta node (consensus:{}, delegates:{}, data:{})",
                    config.consensus_port,
                    config.delegate_size,
                    config.data_dir.display(),
                );

                let governor = volta_node::EpochGovernor::new(
                    volta_state::MemState::new(),
                    config.delegate_size,
                );
                // Transport and execution engines attach here; the governor
                // runs the epoch boundary for the pacemaker.
                let _governor = governor;

                tokio::signal::ctrl_c().await?;
                tracing::info!("shutdown signal received, stopping node");
            }
        },
    }

    Ok(())
}

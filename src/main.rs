//! Monitor Charts - Main Server
//!
//! Serves the custom graphs view over a monitoring JSON-RPC API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use monitor_charts::{auth::jwt::encode_jwt, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "monitor-charts")]
#[command(about = "Custom graphs view server")]
struct Cli {
    /// Path to the YAML config file (default: ./config.yaml)
    #[arg(short, long, global = true, env = "MONITOR_CHARTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config.yaml and SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Mint a bearer token for a user with the configured JWT secret
    Token {
        /// Numeric user id
        #[arg(long)]
        user_id: u64,

        /// User type: 1 user, 2 admin, 3 super admin
        #[arg(long, default_value = "1")]
        user_type: u8,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,monitor_charts=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            monitor_charts::start_server(config).await
        }
        Commands::Token { user_id, user_type } => {
            let auth = config
                .auth_config
                .context("No auth section configured, cannot sign tokens")?;
            let token = encode_jwt(user_id, user_type, &auth.jwt_secret, auth.jwt_expiry_secs)?;
            println!("{}", token);
            Ok(())
        }
    }
}

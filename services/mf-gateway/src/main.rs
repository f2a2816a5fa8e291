//! StAR MF Gateway - Main Entry Point

use anyhow::Result;
use clap::{Arg, Command};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mf_gateway::{GatewayConfig, start_server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mf_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = Command::new("mf-gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .about("REST and SOAP gateway for the BSE StAR MF platform")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("gateway.toml"),
        )
        .arg(
            Arg::new("routes")
                .long("routes")
                .help("Print available routes and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-config")
                .long("check-config")
                .help("Load and validate the configuration, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("routes") {
        mf_gateway::server::print_routes();
        return Ok(());
    }

    let default_config = "gateway.toml".to_string();
    let config_path = matches
        .get_one::<String>("config")
        .unwrap_or(&default_config);

    if matches.get_flag("check-config") {
        let config = GatewayConfig::from_file(config_path)?;
        config.validate()?;
        info!("Configuration {} is valid", config_path);
        return Ok(());
    }

    let config = match GatewayConfig::from_file(config_path) {
        Ok(config) => {
            info!("Loaded configuration from: {}", config_path);
            config
        }
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path, e);
            info!("Using default configuration");
            GatewayConfig::default()
        }
    };

    info!("Starting StAR MF gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("Server will bind to: {}", config.server_address());
    info!("Counterparty endpoints:");
    info!("  Order entry: {}", config.counterparty.order_entry_url);
    info!("  Password: {}", config.counterparty.password_url);
    info!("  UCC: {}", config.counterparty.ucc_url);
    info!("  Enhanced API: {}", config.counterparty.enhanced_api_url);
    info!("  ELOG: {}", config.counterparty.elog_url);

    info!("Features enabled:");
    info!("  CORS: {}", config.cors.enabled);
    info!("  Metrics: {}", config.monitoring.metrics_enabled);
    info!("  Compression: {}", config.server.compression);

    if let Err(e) = start_server(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

use std::env;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

const CONFIG_DIR_VAR: &str = "PAYROLL_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "./config";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "Payroll engine failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    let bind_address = config.config().server.bind_address.clone();

    info!(
        config_dir = %config_dir,
        employees = config.roster().employees.len(),
        "Loaded configuration"
    );

    let router = create_router(AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(bind_address = %bind_address, "Payroll engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}

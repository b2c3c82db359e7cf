use anyhow::Context;
use school_store::{SchoolStore, StoreConfig, env::load_environment, telemetry::init_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(e) = load_environment() {
        error!("Failed to load environment: {}", e);
        return Err(e.into());
    }

    let config = StoreConfig::from_env().context("Invalid store configuration")?;

    let store = SchoolStore::open(&config).await?;

    info!("Initializing school database...");
    store.initialize().await?;

    let users = store.get_users().await?;
    info!("Database ready with {} registered users", users.len());

    println!("{}", serde_json::to_string_pretty(&users)?);

    store.close().await;
    Ok(())
}

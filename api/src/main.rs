use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;

use hive_api::{bootstrap, create_app};
use hive_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );

    config.validate().context("Refusing to start")?;

    info!(
        "Starting StudyHive API v{} in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let state = web::Data::new(bootstrap::build_state(config).await?);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if workers > 0 {
        server = server.workers(workers);
    }

    info!("Listening on {}", bind_address);
    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}

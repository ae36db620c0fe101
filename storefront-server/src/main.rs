use storefront_server::utils::logger;
use storefront_server::{AppState, Config, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    let _log_guard = logger::init_logger(&config.environment, Some(log_dir.as_path()));

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "storefront server starting"
    );

    let state = AppState::initialize(&config).await?;
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}

use paveai_api::setup;
use paveai_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; missing storage credentials abort startup here.
    let config = Config::from_env()?;

    setup::telemetry::init_telemetry(&config);

    // Initialize the application state and routes
    let (_state, router) = setup::initialize_app(config.clone())?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}

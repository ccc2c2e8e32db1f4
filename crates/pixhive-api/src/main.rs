use pixhive_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    pixhive_api::setup::init_tracing();

    // Initialize the application (state, storage adapter, routes)
    let (_state, router) = pixhive_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    pixhive_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

use resolvesuite_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (connection gate, storage, routes)
    let (_state, router) = resolvesuite_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    resolvesuite_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

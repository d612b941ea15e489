use ascension::{
    config::{self, database::create_tables},
    core::seed::seed_catalog,
    errors::Result,
    store::Store,
    web,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Connect and make sure every table exists
    let store = Store::connect(&app_config.database)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(store.conn())
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the catalog skeleton from config
    seed_catalog(&store, &app_config.catalog)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Serve
    web::serve(store, &app_config.server.bind_address)
        .await
        .inspect_err(|e| error!("Server stopped: {}", e))
}

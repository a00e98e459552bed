use std::sync::Arc;

use tracing::{error, info};

use skydrive::web::middleware::JwtState;
use skydrive::web::{AppState, WebServer};
use skydrive::{Config, Database, FileStorage};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let mut config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = skydrive::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        skydrive::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> skydrive::Result<()> {
    config.validate()?;

    info!("SkyDrive starting");

    let db = Database::open(&config.database.path).await?;
    let storage = FileStorage::new(&config.files.storage_path)?;
    info!("File storage at {}", config.files.storage_path);

    let jwt = Arc::new(JwtState::new(
        &config.web.jwt_secret,
        config.web.jwt_access_token_expiry_secs,
    ));
    let state = AppState::new(db, storage, jwt, config.web.public_url.clone());

    let max_upload_bytes = usize::try_from(config.files.max_upload_bytes()).unwrap_or(usize::MAX);
    WebServer::new(&config.web, state, max_upload_bytes)?
        .run()
        .await
}

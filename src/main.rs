use anyhow::Result;
use drive_store::{
    auth::Authenticator,
    config, db,
    media::ImageKitClient,
    routes,
    services::DriveService,
    state::AppState,
};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!("no .env file loaded: {}", err);
    }
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting drive-store with config: {:?}", cfg);

    // --- Initialize SQLite connection ---
    let db = Arc::new(db::connect(&cfg.database_url, 5).await?);

    // --- Handle migration mode ---
    if migrate {
        db::run_migrations(&db).await?;
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    // --- Initialize core services ---
    let media = ImageKitClient::new(cfg.imagekit.clone());
    tracing::info!("Media uploads go to {}", media.config().upload_url);
    if cfg.max_request_bytes < cfg.upload_policy.max_item_bytes() as usize {
        tracing::warn!(
            "DRIVE_MAX_REQUEST_BYTES ({}) is below the largest per-file limit ({})",
            cfg.max_request_bytes,
            cfg.upload_policy.max_item_bytes()
        );
    }
    let drive = DriveService::new(db.clone(), Arc::new(media), cfg.upload_policy);
    let auth = Arc::new(Authenticator::new(&cfg.auth_key, cfg.auth_issuer.as_deref())?);

    // --- Build router ---
    let app = routes::routes::app(AppState::new(drive, auth), cfg.max_request_bytes);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

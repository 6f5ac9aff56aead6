use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

use scan_tracker::config::Config;
use scan_tracker::docs;
use scan_tracker::routes;
use scan_tracker::storage::Store;
use scan_tracker::storage::scans::ScanLog;
use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Scan tracker"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = Store::open(&config.storage, config.database_url.as_deref())
        .await
        .context("failed to open store")?;
    let store = Arc::new(store);
    let scan_log = ScanLog::new(store.clone());

    let limiter = Arc::new(routes::build_limiter(config.rate_api_per_min)?);
    let api_prefix = config.api_prefix.clone();
    let api_doc = docs::api_doc(&config.api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} matches JS/CSS files
                    .url("/api-doc/openapi.json", api_doc.clone()),
            )
            .app_data(Data::new(scan_log.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiter.clone()))
    })
    .bind(&config.server_addr)
    .with_context(|| format!("failed to bind {}", config.server_addr))?
    .run()
    .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}

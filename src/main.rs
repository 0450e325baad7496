use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod service;
mod store;

use config::{Config, StoreBackend};
use db::{ensure_schema, init_db};
use service::AttendanceService;
use store::{AttendanceStore, MemoryStore, MySqlStore, UserStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Server is working!"
}

/// One store instance backs both seams.
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn AttendanceStore>, Arc<dyn UserStore>)> {
    match config.store_backend {
        StoreBackend::MySql => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = init_db(url).await?;
            ensure_schema(&pool).await?;

            let store = Arc::new(MySqlStore::new(pool));
            let attendance: Arc<dyn AttendanceStore> = store.clone();
            let users: Arc<dyn UserStore> = store;
            Ok((attendance, users))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store, data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            let attendance: Arc<dyn AttendanceStore> = store.clone();
            let users: Arc<dyn UserStore> = store;
            Ok((attendance, users))
        }
    }
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
        .init();

    info!("Server starting...");

    let (attendance_store, user_store) = open_store(&config).await?;
    let service = Data::new(AttendanceService::new(attendance_store));
    let users: Data<dyn UserStore> = Data::from(user_store);

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);
    let app_service = service.clone();

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(routes::cors())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(app_service.clone())
            .app_data(users.clone())
            .app_data(config_data.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config_data))
    })
    .bind(server_addr)?
    .run()
    .await?;

    info!("Server stopped, closing store");
    service.close().await;

    Ok(())
}

pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use std::error::Error;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::{AppConfig, Storage};
pub use db::{create_pool, DbPool};
pub use state::{AppState, SharedCatalog};

use crate::errors::AppError;
use crate::infrastructure::{DieselCatalogRepository, InMemoryCatalog};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), BoxError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Opens the catalog store selected by the configuration, migrating the
/// database first when one is used.
pub fn open_catalog(config: &AppConfig) -> Result<SharedCatalog, BoxError> {
    match &config.storage {
        Storage::Postgres { database_url } => {
            let pool = create_pool(database_url)?;
            run_migrations(&pool)?;
            Ok(Arc::new(DieselCatalogRepository::new(pool)))
        }
        Storage::Memory => {
            log::warn!("using in-memory catalog, data is lost on restart");
            Ok(Arc::new(InMemoryCatalog::new()))
        }
    }
}

/// Malformed JSON bodies are reported like any other validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::invalid_body(err.to_string()).into())
}

/// Unparseable query strings, e.g. `?page=abc`, become a 400 on `query`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::invalid_field("query", err.to_string()).into())
}

/// Path segments that do not parse, such as a malformed cart id, become a 400 on `path`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::invalid_field("path", err.to_string()).into())
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Build and return an actix-web `Server` bound to the configured address.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    config: &AppConfig,
) -> std::io::Result<actix_web::dev::Server> {
    let origins = config.cors_origins.clone();
    let openapi = handlers::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}

use actix_web::web;
use dotenvy::dotenv;
use shop_service::{build_server, open_catalog, AppConfig, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let catalog = open_catalog(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(catalog));

    log::info!(
        "Starting {} at http://{}:{}",
        config.app_name,
        config.host,
        config.port
    );

    build_server(state, &config)?.await
}

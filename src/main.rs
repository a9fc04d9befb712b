mod access;
mod api;
mod article;
mod blockchain;
mod config;
mod consensus;
mod error;
mod mock;
mod prefs;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let (host, port) = (config.host.clone(), config.port);
    info!(
        "config: difficulty={} max_nonce={} page_size_max={} prefs={:?}",
        config.default_difficulty, config.max_nonce, config.page_size_max, config.prefs_path
    );

    println!("⛓️ Starting DemoChain API at http://{host}:{port}");

    let state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

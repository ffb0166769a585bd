mod accounts;
mod config;
mod credentials;
mod errors;
mod job_controller;
mod services;
mod store;
mod timing;
mod voice_api;

use crate::config::Config;
use crate::services::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let state = AppState::new(&config, credentials::key_from_env()).map_err(io::Error::other)?;

    info!(
        "Liaison running at http://{}:{} (project {}, documents {}, mappings {})",
        config.host,
        config.port,
        config.store.project,
        config.store.documents_path.display(),
        config.store.mappings_path.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(256 * 1024))
            .app_data(web::Data::new(state.clone()))
            .service(services::voice::configure_routes())
            .service(services::commands::configure_routes())
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

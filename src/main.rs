use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use config::{Backend, Config};
use store::{MemoryStore, Store};

mod access;
mod auth;
mod catalog;
mod config;
mod dashboard;
mod db;
mod error;
mod handlers;
mod messaging;
mod middleware;
mod models;
mod ordering;
mod store;

async fn open_store(config: &Config) -> std::io::Result<Arc<dyn Store>> {
    match (config.backend, config.database_url.as_deref()) {
        (Backend::Mongo, Some(url)) => {
            let database = db::connect(url, &config.database_name)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            log::info!("using mongodb database {}", config.database_name);
            Ok(Arc::new(db::MongoStore::new(&database)))
        }
        (Backend::Mongo, None) => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "DATABASE_URL must be set for the mongo backend",
        )),
        (Backend::Memory, _) => {
            log::warn!("using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let store = web::Data::from(open_store(&config).await?);
    let tokens = web::Data::new(auth::Tokens::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
    ));
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("listening on {}", bind_addr);
    HttpServer::new(move || {
        let routes_tokens = tokens.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(tokens.clone())
            .app_data(config.clone())
            .configure(move |cfg| handlers::configure(cfg, routes_tokens))
    })
    .bind(bind_addr)?
    .run()
    .await
}

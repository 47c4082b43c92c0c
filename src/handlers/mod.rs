use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest};

use crate::auth::Tokens;
use crate::error::AppError;
use crate::middleware::AuthMiddleware;

pub mod admin;
pub mod auth;
pub mod catalog;

fn rejected_body(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("rejected body on {}: {}", req.path(), err);
    AppError::Validation("Data yang dikirim tidak lengkap atau tidak valid".to_string()).into()
}

fn rejected_query(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("rejected query on {}: {}", req.path(), err);
    AppError::Validation("Parameter permintaan tidak valid".to_string()).into()
}

/// Registers every route. Expects `web::Data<dyn Store>`, `web::Data<Tokens>`
/// and `web::Data<Config>` to be registered as app data.
pub fn configure(cfg: &mut web::ServiceConfig, tokens: web::Data<Tokens>) {
    cfg.app_data(web::JsonConfig::default().error_handler(rejected_body))
        .app_data(web::QueryConfig::default().error_handler(rejected_query))
        .route("/signup", web::post().to(auth::sign_up))
        .route("/signin", web::post().to(auth::sign_in))
        .route("/fruits", web::get().to(catalog::list_fruits))
        .route("/fruits/{id}", web::get().to(catalog::get_fruit))
        .route("/orders", web::post().to(catalog::place_order))
        .service(
            web::resource("/session")
                .wrap(AuthMiddleware::new(tokens.clone()))
                .route(web::get().to(auth::session)),
        )
        .service(
            web::resource("/signout")
                .wrap(AuthMiddleware::new(tokens.clone()))
                .route(web::post().to(auth::sign_out)),
        )
        .service(
            web::scope("/admin")
                .wrap(AuthMiddleware::admin(tokens))
                .route("/dashboard", web::get().to(admin::dashboard))
                .route("/stats", web::get().to(admin::stats))
                .route("/fruits", web::get().to(admin::list_fruits))
                .route("/fruits", web::post().to(admin::create_fruit))
                .route("/fruits/{id}", web::put().to(admin::update_fruit))
                .route("/fruits/{id}", web::delete().to(admin::delete_fruit))
                .route("/orders", web::get().to(admin::list_orders))
                .route("/orders/{id}/status", web::put().to(admin::update_order_status))
                .route("/orders/{id}/whatsapp", web::get().to(admin::payment_link)),
        );
}

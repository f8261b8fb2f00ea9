pub mod config;
pub mod database;
pub mod distribution;
pub mod error;
pub mod handlers;
pub mod helpers;

pub use database::Database;

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use error::ApiError;
use std::sync::Arc;

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!("Not Found - {}", req.uri())))
}

/// Registers every API route. The app must provide `web::Data` for
/// `Arc<Database>`, `SessionTokens` and `UploadConfig`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    cfg.app_data(json_config)
        .service(health)
        .service(
            web::scope("/api/users")
                .route("/register", web::post().to(handlers::auth::register))
                .route("/login", web::post().to(handlers::auth::login))
                .route("/me", web::get().to(handlers::auth::me))
                .route("/logout", web::get().to(handlers::auth::logout)),
        )
        .service(
            web::scope("/api/agents")
                .route("", web::post().to(handlers::agents::create_agent))
                .route("", web::get().to(handlers::agents::list_agents))
                .route("/{id}", web::get().to(handlers::agents::get_agent))
                .route("/{id}", web::put().to(handlers::agents::update_agent))
                .route("/{id}", web::delete().to(handlers::agents::delete_agent)),
        )
        .service(
            web::scope("/api/lists")
                .route("/upload", web::post().to(handlers::lists::upload_list))
                .route("/summary", web::get().to(handlers::lists::list_summary))
                .route("/batch/{batch_id}", web::get().to(handlers::lists::batch_detail))
                .route("/agent/{agent_id}", web::get().to(handlers::lists::agent_lists)),
        );
}

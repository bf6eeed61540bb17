//! REST API routes for CoverdUp

pub mod album;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod game;

use actix_web::{get, web, HttpResponse, Responder};

/// health check
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Configure all API routes under /api
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            // Auth routes
            .service(web::scope("/auth").configure(auth::configure))
            // Local album catalog
            .service(web::scope("/albums").configure(album::configure))
            // Daily game
            .service(web::scope("/game").configure(game::configure))
            // Spotify integration
            .service(web::scope("/spotify").configure(catalog::configure)),
    );
}

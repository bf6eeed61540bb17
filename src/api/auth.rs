//! Authentication routes, bearer token JWT

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::api::error::internal_error;
use crate::config::UserConfig;
use crate::db::tables::UserTable;
use crate::models::User;
use crate::utils::auth::{
    create_jwt, hash_password, verify_jwt, verify_password, ACCESS_TOKEN_TTL,
};

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// register endpoint
#[post("/register")]
pub async fn register(body: web::Json<RegisterRequest>) -> impl Responder {
    let email = body.email.trim().to_lowercase();
    let username = body.username.trim().to_string();

    if email.is_empty() || username.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email, username and password are required"
        }));
    }
    if body.password.len() < 6 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Password must be at least 6 characters"
        }));
    }

    match UserTable::get_by_email(&email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Email already in use"
            }));
        }
        Ok(None) => {}
        Err(e) => return internal_error("Failed to look up email", e),
    }

    match UserTable::get_by_username(&username).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Username already taken"
            }));
        }
        Ok(None) => {}
        Err(e) => return internal_error("Failed to look up username", e),
    }

    let config = match UserConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => return internal_error("Failed to load config", e),
    };

    let hashed = hash_password(&body.password, &config.server_id);
    let user = User::new(email, username, hashed);

    let user_id = match UserTable::insert(&user).await {
        Ok(id) => id,
        Err(e) => return internal_error("Failed to create user", e),
    };

    let user = match UserTable::get_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return internal_error(
                "User insert did not persist",
                anyhow::anyhow!("missing row {}", user_id),
            )
        }
        Err(e) => return internal_error("Failed to load user", e),
    };

    match create_jwt(user.id, &config.server_id, "access", ACCESS_TOKEN_TTL) {
        Ok(token) => HttpResponse::Created().json(serde_json::json!({
            "user": user.to_public(),
            "token": token,
            "message": "Account created"
        })),
        Err(e) => internal_error("Failed to create token", e),
    }
}

/// login endpoint
#[post("/login")]
pub async fn login(body: web::Json<LoginRequest>) -> impl Responder {
    let email = body.email.trim().to_lowercase();

    let config = match UserConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => return internal_error("Failed to load config", e),
    };

    match UserTable::get_by_email(&email).await {
        Ok(Some(user)) => {
            if !verify_password(&body.password, &config.server_id, &user.password) {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "message": "Invalid email or password"
                }));
            }

            match create_jwt(user.id, &config.server_id, "access", ACCESS_TOKEN_TTL) {
                Ok(token) => HttpResponse::Ok().json(serde_json::json!({
                    "user": user.to_public(),
                    "token": token,
                    "message": "Logged in"
                })),
                Err(e) => internal_error("Failed to create token", e),
            }
        }
        // same response as a wrong password, no account enumeration
        Ok(None) => HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Invalid email or password"
        })),
        Err(e) => internal_error("Failed to look up user", e),
    }
}

/// current user endpoint
#[get("/me")]
pub async fn me(req: HttpRequest) -> impl Responder {
    let user = match require_user(&req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(serde_json::json!({
        "user": user.to_public()
    }))
}

/// Resolve the caller, rejecting unauthenticated requests
pub async fn require_user(req: &HttpRequest) -> Result<User, HttpResponse> {
    match optional_user(req).await? {
        Some(user) => Ok(user),
        None => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Not authenticated"
        }))),
    }
}

/// Resolve the caller if a valid bearer token is present. Missing tokens are
/// fine (anonymous play); invalid ones are rejected.
pub async fn optional_user(req: &HttpRequest) -> Result<Option<User>, HttpResponse> {
    let token = match bearer_token(req)? {
        Some(t) => t,
        None => return Ok(None),
    };

    let config = match UserConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => return Err(internal_error("Failed to load config", e)),
    };

    let claims = match verify_jwt(&token, &config.server_id, Some("access")) {
        Ok(c) => c,
        Err(_) => {
            return Err(HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Invalid token"
            })));
        }
    };

    match UserTable::get_by_id(claims.sub).await {
        Ok(Some(user)) => Ok(Some(user)),
        Ok(None) => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Invalid token"
        }))),
        Err(e) => Err(internal_error("Failed to load user", e)),
    }
}

fn bearer_token(req: &HttpRequest) -> Result<Option<String>, HttpResponse> {
    match req.headers().get("Authorization") {
        Some(header_value) => {
            let header_str = header_value.to_str().unwrap_or("").trim();

            let token = header_str.strip_prefix("Bearer ").unwrap_or(header_str);
            if token.is_empty() {
                return Err(HttpResponse::Unauthorized().json(serde_json::json!({
                    "message": "Invalid token format"
                })));
            }

            Ok(Some(token.to_string()))
        }
        None => Ok(None),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}

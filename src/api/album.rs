//! Album catalog routes

use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::api::error::internal_error;
use crate::db::tables::AlbumTable;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// list albums with pagination and an optional search filter
#[get("")]
pub async fn list_albums(query: web::Query<ListQuery>) -> impl Responder {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match AlbumTable::paginate(page, limit, query.search.as_deref()).await {
        Ok((albums, total)) => {
            let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
            HttpResponse::Ok().json(serde_json::json!({
                "albums": albums,
                "pagination": {
                    "page": page,
                    "limit": limit,
                    "total": total,
                    "pages": pages,
                }
            }))
        }
        Err(e) => internal_error("Failed to list albums", e),
    }
}

/// one random album from the local catalog
#[get("/random/one")]
pub async fn random_album() -> impl Responder {
    match AlbumTable::random().await {
        Ok(Some(album)) => HttpResponse::Ok().json(serde_json::json!({ "album": album })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "No albums available"
        })),
        Err(e) => internal_error("Failed to pick album", e),
    }
}

/// get one album by id
#[get("/{id}")]
pub async fn get_album(path: web::Path<i64>) -> impl Responder {
    match AlbumTable::get_by_id(path.into_inner()).await {
        Ok(Some(album)) => HttpResponse::Ok().json(serde_json::json!({ "album": album })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Album not found"
        })),
        Err(e) => internal_error("Failed to load album", e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // random/one before {id} so it is not swallowed by the path param
    cfg.service(list_albums).service(random_album).service(get_album);
}

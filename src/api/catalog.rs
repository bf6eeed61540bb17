//! Spotify catalog routes
//!
//! Results picked for gameplay are saved into the local album table so a
//! game can reference them by row id afterwards. Suggestions degrade to an
//! empty list on any upstream failure so the autocomplete never breaks.

use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, warn};

use crate::api::error::internal_error;
use crate::catalog::{AlbumInfo, SpotifyClient};
use crate::db::tables::AlbumTable;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

fn album_info_json(album: &AlbumInfo) -> serde_json::Value {
    serde_json::json!({
        "spotifyId": album.spotify_id,
        "title": album.title,
        "artist": album.artist,
        "coverUrl": album.cover_url,
        "spotifyUrl": album.spotify_url,
    })
}

/// one random popular album, saved into the local catalog
#[get("/random")]
pub async fn random_album() -> impl Responder {
    let spotify = SpotifyClient::shared();

    let albums = match spotify.random_albums(1).await {
        Ok(albums) => albums,
        Err(e) => {
            error!("Spotify random lookup failed: {:#}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to get random album"
            }));
        }
    };

    let info = match albums.into_iter().next() {
        Some(info) => info,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "No albums found"
            }));
        }
    };

    match AlbumTable::upsert_by_spotify_id(&info.to_album()).await {
        Ok(album) => HttpResponse::Ok().json(serde_json::json!({ "album": album })),
        Err(e) => internal_error("Failed to store album", e),
    }
}

/// search albums upstream
#[get("/search")]
pub async fn search_albums(query: web::Query<SearchQuery>) -> impl Responder {
    let q = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Query parameter is required"
            }));
        }
    };
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let spotify = SpotifyClient::shared();
    match spotify.search_albums(q, limit).await {
        Ok(albums) => {
            // opportunistic: a failed save never fails the search
            for info in &albums {
                if let Err(e) = AlbumTable::upsert_by_spotify_id(&info.to_album()).await {
                    warn!("Failed to store search result: {:#}", e);
                }
            }
            HttpResponse::Ok().json(serde_json::json!({
                "albums": albums.iter().map(album_info_json).collect::<Vec<_>>()
            }))
        }
        Err(e) => {
            error!("Spotify search failed: {:#}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to search albums"
            }))
        }
    }
}

/// autocomplete suggestions, always 200
#[get("/suggestions")]
pub async fn suggestions(query: web::Query<SearchQuery>) -> impl Responder {
    let q = match query.q.as_deref().map(str::trim) {
        Some(q) if q.chars().count() >= 2 => q.to_string(),
        _ => {
            return HttpResponse::Ok().json(serde_json::json!({ "suggestions": [] }));
        }
    };
    let limit = query.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);

    let spotify = SpotifyClient::shared();
    match spotify.search_albums(&q, limit).await {
        Ok(albums) => {
            let suggestions = albums
                .iter()
                .map(|album| {
                    serde_json::json!({
                        "id": album.spotify_id,
                        "title": album.title,
                        "artist": album.artist,
                        "displayText": format!("{} - {}", album.title, album.artist),
                    })
                })
                .collect::<Vec<_>>();
            HttpResponse::Ok().json(serde_json::json!({ "suggestions": suggestions }))
        }
        Err(e) => {
            warn!("Suggestion lookup failed, returning empty list: {:#}", e);
            HttpResponse::Ok().json(serde_json::json!({ "suggestions": [] }))
        }
    }
}

/// one album by Spotify id, saved into the local catalog
#[get("/album/{id}")]
pub async fn get_album(path: web::Path<String>) -> impl Responder {
    let spotify = SpotifyClient::shared();

    let info = match spotify.get_album_by_id(&path.into_inner()).await {
        Ok(info) => info,
        Err(e) => {
            error!("Spotify album lookup failed: {:#}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to get album"
            }));
        }
    };

    match AlbumTable::upsert_by_spotify_id(&info.to_album()).await {
        Ok(album) => HttpResponse::Ok().json(serde_json::json!({ "album": album })),
        Err(e) => internal_error("Failed to store album", e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(random_album)
        .service(search_albums)
        .service(suggestions)
        .service(get_album);
}

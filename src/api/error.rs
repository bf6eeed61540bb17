//! Shared error responses

use actix_web::HttpResponse;
use tracing::error;

use crate::core::GameError;

/// Map a game error onto an HTTP response with a `{"message": ...}` body
pub fn game_error_response(err: GameError) -> HttpResponse {
    match err {
        GameError::InvalidInput(msg) => HttpResponse::BadRequest().json(serde_json::json!({
            "message": msg
        })),
        GameError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
            "message": msg
        })),
        GameError::NoGuessesLeft => HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No guesses left"
        })),
        GameError::AlreadyCompleted => HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Game is already completed"
        })),
        GameError::NoAlbumsAvailable => HttpResponse::NotFound().json(serde_json::json!({
            "message": "No albums available"
        })),
        GameError::Store(err) => {
            // log the real cause, never leak it to the client
            error!("Storage error: {:#}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal server error"
            }))
        }
    }
}

/// Generic internal error response, with the cause logged server-side
pub fn internal_error(context: &str, err: anyhow::Error) -> HttpResponse {
    error!("{}: {:#}", context, err);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Internal server error"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let resp = game_error_response(GameError::InvalidInput("bad".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = game_error_response(GameError::NotFound("missing".to_string()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = game_error_response(GameError::NoGuessesLeft);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = game_error_response(GameError::AlreadyCompleted);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = game_error_response(GameError::NoAlbumsAvailable);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = game_error_response(GameError::Store(anyhow::anyhow!("db gone")));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

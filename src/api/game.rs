//! Daily game routes

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::api::auth::{optional_user, require_user};
use crate::api::error::game_error_response;
use crate::core::game::{
    self, AlbumHint, EphemeralGuess, EphemeralState, GuessResult, GuessSubmission, LoadedGame,
    TodayGame,
};
use crate::models::game::{GameId, GameIdParam, STARTING_GUESSES, STARTING_PIXELATION};
use crate::models::{GameRef, Guess};
use crate::utils::dates::timestamp_to_rfc3339;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

/// Guess request. Anonymous clients echo the album (and their counters)
/// because ephemeral games have no server-side state.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    pub game_id: GameIdParam,
    pub guess: String,
    #[serde(default)]
    pub album: Option<AlbumHint>,
    #[serde(default)]
    pub guesses_left: Option<i64>,
    #[serde(default)]
    pub pixelation: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// actix's #[post("/guess")] below generates a unit struct named `guess`,
// so these helpers must not use that word as a parameter name
fn guess_json(record: &Guess) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "guess": record.guess,
        "isCorrect": record.is_correct,
        "createdAt": timestamp_to_rfc3339(record.created_at),
    })
}

fn game_json(loaded: &LoadedGame) -> serde_json::Value {
    serde_json::json!({
        "id": GameId::Persisted(loaded.game.id),
        "day": loaded.game.day,
        "guessesLeft": loaded.game.guesses_left,
        "pixelation": loaded.game.pixelation,
        "isCompleted": loaded.game.is_completed,
        "isWon": loaded.game.is_won,
        "album": loaded.album,
        "guesses": loaded.guesses.iter().map(guess_json).collect::<Vec<_>>(),
        "createdAt": timestamp_to_rfc3339(loaded.game.created_at),
    })
}

fn ephemeral_game_json(state: &EphemeralState) -> serde_json::Value {
    serde_json::json!({
        "id": GameId::Ephemeral(state.id.clone()),
        "guessesLeft": state.guesses_left,
        "pixelation": state.pixelation,
        "isCompleted": state.is_completed,
        "isWon": state.is_won,
        "album": state.album,
    })
}

fn ephemeral_guess_json(record: &EphemeralGuess) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "guess": record.guess,
        "isCorrect": record.is_correct,
        "createdAt": timestamp_to_rfc3339(record.created_at),
    })
}

/// today's game, created on first request. Anonymous callers get an
/// ephemeral game that is never stored.
#[get("/today")]
pub async fn today(req: HttpRequest) -> impl Responder {
    let user = match optional_user(&req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match game::today_game(user.as_ref()).await {
        Ok(TodayGame::Persisted(loaded)) => HttpResponse::Ok().json(serde_json::json!({
            "game": game_json(&loaded)
        })),
        Ok(TodayGame::Ephemeral { id, album }) => HttpResponse::Ok().json(serde_json::json!({
            "game": {
                "id": GameId::Ephemeral(id),
                "guessesLeft": STARTING_GUESSES,
                "pixelation": STARTING_PIXELATION,
                "isCompleted": false,
                "isWon": false,
                "album": album,
                "guesses": [],
            }
        })),
        Err(err) => game_error_response(err),
    }
}

/// submit one guess
#[post("/guess")]
pub async fn guess(req: HttpRequest, body: web::Json<GuessRequest>) -> impl Responder {
    let user = match optional_user(&req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let body = body.into_inner();

    let game_ref = match GameRef::parse(&body.game_id) {
        Some(r) => r,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid game id"
            }));
        }
    };

    let submission = GuessSubmission {
        game: game_ref,
        text: body.guess,
        album_hint: body.album,
        guesses_left: body.guesses_left,
        pixelation: body.pixelation,
    };

    match game::submit_guess(user.as_ref(), submission).await {
        Ok(GuessResult::Persisted { loaded, guess }) => {
            let message = if guess.is_correct {
                "Correct!"
            } else if loaded.game.is_completed {
                "Out of guesses"
            } else {
                "Wrong guess"
            };
            HttpResponse::Ok().json(serde_json::json!({
                "game": game_json(&loaded),
                "guess": guess_json(&guess),
                "message": message,
            }))
        }
        Ok(GuessResult::Ephemeral { state, guess }) => {
            let message = if guess.is_correct {
                "Correct!"
            } else if state.is_completed {
                "Out of guesses"
            } else {
                "Wrong guess"
            };
            HttpResponse::Ok().json(serde_json::json!({
                "game": ephemeral_game_json(&state),
                "guess": ephemeral_guess_json(&guess),
                "message": message,
            }))
        }
        Err(err) => game_error_response(err),
    }
}

/// paginated game history, newest first, auth required
#[get("/history")]
pub async fn history(req: HttpRequest, query: web::Query<HistoryQuery>) -> impl Responder {
    let user = match require_user(&req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match game::history(&user, page, limit).await {
        Ok(history) => HttpResponse::Ok().json(serde_json::json!({
            "games": history.games.iter().map(game_json).collect::<Vec<_>>(),
            "pagination": {
                "page": history.page,
                "limit": history.limit,
                "total": history.total,
                "pages": history.pages,
            }
        })),
        Err(err) => game_error_response(err),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(today).service(guess).service(history);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_json_shape() {
        let record = Guess {
            id: 3,
            game_id: 1,
            user_id: 2,
            guess: "Abbey Road".to_string(),
            is_correct: true,
            created_at: 0,
        };

        let json = guess_json(&record);
        assert_eq!(json["id"], 3);
        assert_eq!(json["guess"], "Abbey Road");
        assert_eq!(json["isCorrect"], true);
        assert!(json["createdAt"]
            .as_str()
            .unwrap()
            .starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_ephemeral_guess_json_shape() {
        let record = EphemeralGuess {
            id: "temp_guess_1".to_string(),
            guess: "Nevermind".to_string(),
            is_correct: false,
            created_at: 0,
        };

        let json = ephemeral_guess_json(&record);
        assert_eq!(json["id"], "temp_guess_1");
        assert_eq!(json["isCorrect"], false);
    }
}

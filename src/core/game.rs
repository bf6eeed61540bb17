//! Game state machine
//!
//! One game per user per calendar day. Games start at 5 guesses and
//! pixelation 7; each guess consumes one of each (pixelation floors at 1)
//! and the game ends when a guess is correct (`Won`) or the guesses run out
//! (`Exhausted`).
//!
//! Anonymous players get ephemeral games: nothing is persisted, the album is
//! carried round-trip by the client and echoed back with each guess. The
//! server trusts that echo completely, which means an anonymous client can
//! always claim a win. Accepted: anonymous play is untracked and
//! non-competitive.

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::evaluator::evaluate;
use crate::db::tables::{AlbumTable, GameTable, GuessTable};
use crate::models::game::{ephemeral_game_id, STARTING_GUESSES, STARTING_PIXELATION};
use crate::models::{Album, Game, GameRef, Guess, User};
use crate::utils::dates;

/// Album data echoed by anonymous clients with each guess
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumHint {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// A guess submission after boundary parsing
#[derive(Debug, Clone)]
pub struct GuessSubmission {
    pub game: GameRef,
    pub text: String,
    /// Required for ephemeral games
    pub album_hint: Option<AlbumHint>,
    /// Client-held counters for ephemeral games; defaults to a fresh game
    pub guesses_left: Option<i64>,
    pub pixelation: Option<i64>,
}

/// Counter state after one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub guesses_left: i64,
    pub pixelation: i64,
    pub is_completed: bool,
    pub is_won: bool,
}

/// Advance the counters by one guess. Guesses floor at 0, pixelation floors
/// at 1; the game completes on a correct guess or when the guesses run out.
pub fn apply_guess(guesses_left: i64, pixelation: i64, is_correct: bool) -> Transition {
    let guesses_left = (guesses_left - 1).max(0);
    Transition {
        guesses_left,
        pixelation: (pixelation - 1).max(1),
        is_completed: is_correct || guesses_left == 0,
        is_won: is_correct,
    }
}

/// A loaded game with its album and ordered guesses
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub game: Game,
    pub album: Album,
    pub guesses: Vec<Guess>,
}

/// Today's game for a caller
#[derive(Debug, Clone)]
pub enum TodayGame {
    Persisted(LoadedGame),
    /// Fabricated for anonymous callers, never stored
    Ephemeral { id: String, album: Album },
}

/// An ephemeral game snapshot computed from client-echoed state
#[derive(Debug, Clone)]
pub struct EphemeralState {
    pub id: String,
    pub guesses_left: i64,
    pub pixelation: i64,
    pub is_completed: bool,
    pub is_won: bool,
    pub album: AlbumHint,
}

/// A synthetic guess record for ephemeral games
#[derive(Debug, Clone)]
pub struct EphemeralGuess {
    pub id: String,
    pub guess: String,
    pub is_correct: bool,
    pub created_at: i64,
}

/// Result of a guess submission
#[derive(Debug, Clone)]
pub enum GuessResult {
    Persisted {
        loaded: LoadedGame,
        guess: Guess,
    },
    Ephemeral {
        state: EphemeralState,
        guess: EphemeralGuess,
    },
}

/// Get or create the caller's game for the current calendar day.
///
/// Authenticated callers resume their existing game or get a new persisted
/// one; anonymous callers always get a fresh ephemeral game.
pub async fn today_game(user: Option<&User>) -> Result<TodayGame, GameError> {
    match user {
        Some(user) => {
            let day = dates::today();

            if let Some(game) = GameTable::get_for_user_on_day(user.id, &day).await? {
                return Ok(TodayGame::Persisted(load_game(game).await?));
            }

            let album = AlbumTable::random()
                .await?
                .ok_or(GameError::NoAlbumsAvailable)?;

            // Upsert-style create: the unique (user, day) index absorbs
            // concurrent requests, and the re-read below returns whichever
            // insert won.
            GameTable::create_for_day(user.id, album.id, &day).await?;

            let game = GameTable::get_for_user_on_day(user.id, &day)
                .await?
                .ok_or_else(|| {
                    GameError::Store(anyhow::anyhow!("Game creation did not persist"))
                })?;

            Ok(TodayGame::Persisted(load_game(game).await?))
        }
        None => {
            let album = AlbumTable::random()
                .await?
                .ok_or(GameError::NoAlbumsAvailable)?;

            Ok(TodayGame::Ephemeral {
                id: ephemeral_game_id(),
                album,
            })
        }
    }
}

/// Submit one guess against a persisted or ephemeral game
pub async fn submit_guess(
    user: Option<&User>,
    submission: GuessSubmission,
) -> Result<GuessResult, GameError> {
    let text = submission.text.trim().to_string();
    if text.is_empty() {
        return Err(GameError::InvalidInput("Guess is required".to_string()));
    }

    match submission.game {
        GameRef::Ephemeral(id) => {
            let hint = submission.album_hint.ok_or_else(|| {
                GameError::InvalidInput("Album data required for anonymous games".to_string())
            })?;

            let is_correct = evaluate(&text, &hint.title);
            let transition = apply_guess(
                submission.guesses_left.unwrap_or(STARTING_GUESSES),
                submission.pixelation.unwrap_or(STARTING_PIXELATION),
                is_correct,
            );

            let now = chrono::Utc::now().timestamp();
            Ok(GuessResult::Ephemeral {
                state: EphemeralState {
                    id,
                    guesses_left: transition.guesses_left,
                    pixelation: transition.pixelation,
                    is_completed: transition.is_completed,
                    is_won: transition.is_won,
                    album: hint,
                },
                guess: EphemeralGuess {
                    id: format!("temp_guess_{}", chrono::Utc::now().timestamp_millis()),
                    guess: text,
                    is_correct,
                    created_at: now,
                },
            })
        }
        GameRef::Persisted(game_id) => {
            let user = user
                .ok_or_else(|| GameError::NotFound("Game not found".to_string()))?;

            let game = GameTable::get_by_id_for_user(game_id, user.id)
                .await?
                .ok_or_else(|| GameError::NotFound("Game not found".to_string()))?;

            if game.is_completed {
                return Err(GameError::AlreadyCompleted);
            }
            if game.guesses_left <= 0 {
                // unreachable when the terminal rule holds, kept as a guard
                return Err(GameError::NoGuessesLeft);
            }

            let album = AlbumTable::get_by_id(game.album_id)
                .await?
                .ok_or_else(|| GameError::NotFound("Album not found".to_string()))?;

            let is_correct = evaluate(&text, &album.title);

            let (game, guess) = GameTable::apply_guess(game.id, user.id, &text, is_correct)
                .await?
                // the guarded update lost a concurrent race
                .ok_or(GameError::NoGuessesLeft)?;

            let guesses = GuessTable::list_by_game(game.id).await?;

            Ok(GuessResult::Persisted {
                loaded: LoadedGame {
                    game,
                    album,
                    guesses,
                },
                guess,
            })
        }
    }
}

/// A page of game history
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub games: Vec<LoadedGame>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

/// Persisted games for a user, newest first, with full guess lists.
/// Ephemeral games never appear here because they are never stored.
pub async fn history(user: &User, page: i64, limit: i64) -> Result<HistoryPage, GameError> {
    let (games, total) = GameTable::list_by_user(user.id, page, limit).await?;

    let mut loaded = Vec::with_capacity(games.len());
    for game in games {
        loaded.push(load_game(game).await?);
    }

    let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(HistoryPage {
        games: loaded,
        page,
        limit,
        total,
        pages,
    })
}

async fn load_game(game: Game) -> Result<LoadedGame, GameError> {
    let album = AlbumTable::get_by_id(game.album_id)
        .await?
        .ok_or_else(|| GameError::NotFound("Album not found".to_string()))?;
    let guesses = GuessTable::list_by_game(game.id).await?;

    Ok(LoadedGame {
        game,
        album,
        guesses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_sqlite_at;
    use crate::db::tables::UserTable;

    #[test]
    fn test_transition_decrements_both_counters() {
        let t = apply_guess(5, 7, false);
        assert_eq!(t.guesses_left, 4);
        assert_eq!(t.pixelation, 6);
        assert!(!t.is_completed);
        assert!(!t.is_won);
    }

    #[test]
    fn test_transition_win_is_terminal() {
        let t = apply_guess(4, 6, true);
        assert_eq!(t.guesses_left, 3);
        assert!(t.is_completed);
        assert!(t.is_won);
    }

    #[test]
    fn test_transition_exhaustion() {
        let t = apply_guess(1, 3, false);
        assert_eq!(t.guesses_left, 0);
        assert!(t.is_completed);
        assert!(!t.is_won);
    }

    #[test]
    fn test_transition_floors() {
        // guesses floor at 0, pixelation floors at 1
        let t = apply_guess(0, 1, false);
        assert_eq!(t.guesses_left, 0);
        assert_eq!(t.pixelation, 1);
    }

    #[test]
    fn test_counters_monotonically_non_increasing() {
        let mut guesses = STARTING_GUESSES;
        let mut pixelation = STARTING_PIXELATION;
        for _ in 0..10 {
            let t = apply_guess(guesses, pixelation, false);
            assert!(t.guesses_left <= guesses);
            assert!(t.pixelation <= pixelation);
            assert!(t.guesses_left >= 0);
            assert!(t.pixelation >= 1);
            guesses = t.guesses_left;
            pixelation = t.pixelation;
        }
    }

    fn hint(title: &str) -> AlbumHint {
        AlbumHint {
            id: None,
            title: title.to_string(),
            artist: None,
            cover_url: None,
        }
    }

    async fn insert_user(email: &str, username: &str) -> User {
        let id = UserTable::insert(&User::new(
            email.to_string(),
            username.to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();
        UserTable::get_by_id(id).await.unwrap().unwrap()
    }

    /// Full walk through the state machine against a real (temp) database.
    /// Single test function because the engine singleton is process-global.
    #[tokio::test]
    async fn test_game_flow_end_to_end() {
        let tmp = tempfile::TempDir::new().unwrap();
        setup_sqlite_at(&tmp.path().join("test.db")).await.unwrap();

        // empty catalog fails loudly
        let err = today_game(None).await.unwrap_err();
        assert!(matches!(err, GameError::NoAlbumsAvailable));

        let album_id = AlbumTable::insert(&Album::new(
            "Abbey Road".to_string(),
            "The Beatles".to_string(),
            "https://example.com/abbey.jpg".to_string(),
        ))
        .await
        .unwrap();

        let user = insert_user("player@example.com", "player").await;

        // requesting today's game twice returns the same game
        let first = match today_game(Some(&user)).await.unwrap() {
            TodayGame::Persisted(loaded) => loaded,
            TodayGame::Ephemeral { .. } => panic!("expected a persisted game"),
        };
        assert_eq!(first.game.guesses_left, 5);
        assert_eq!(first.game.pixelation, 7);
        assert!(first.guesses.is_empty());
        assert_eq!(first.album.id, album_id);

        let second = match today_game(Some(&user)).await.unwrap() {
            TodayGame::Persisted(loaded) => loaded,
            TodayGame::Ephemeral { .. } => panic!("expected a persisted game"),
        };
        assert_eq!(first.game.id, second.game.id);

        // empty guess is rejected
        let err = submit_guess(
            Some(&user),
            GuessSubmission {
                game: GameRef::Persisted(first.game.id),
                text: "   ".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));

        // wrong guess decrements counters
        let result = submit_guess(
            Some(&user),
            GuessSubmission {
                game: GameRef::Persisted(first.game.id),
                text: "Nevermind".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap();
        let (loaded, guess) = match result {
            GuessResult::Persisted { loaded, guess } => (loaded, guess),
            GuessResult::Ephemeral { .. } => panic!("expected a persisted result"),
        };
        assert!(!guess.is_correct);
        assert_eq!(loaded.game.guesses_left, 4);
        assert_eq!(loaded.game.pixelation, 6);
        assert!(!loaded.game.is_completed);
        assert_eq!(loaded.guesses.len(), 1);

        // correct guess wins, case-insensitively with surrounding whitespace
        let result = submit_guess(
            Some(&user),
            GuessSubmission {
                game: GameRef::Persisted(first.game.id),
                text: " abbey road ".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap();
        let loaded = match result {
            GuessResult::Persisted { loaded, guess } => {
                assert!(guess.is_correct);
                loaded
            }
            GuessResult::Ephemeral { .. } => panic!("expected a persisted result"),
        };
        assert!(loaded.game.is_won);
        assert!(loaded.game.is_completed);
        assert_eq!(loaded.game.guesses_left, 3);
        assert_eq!(loaded.guesses.len(), 2);
        // won iff some guess was correct
        assert!(loaded.guesses.iter().any(|g| g.is_correct));

        // a terminal game rejects further guesses without mutating state
        let err = submit_guess(
            Some(&user),
            GuessSubmission {
                game: GameRef::Persisted(first.game.id),
                text: "Abbey Road".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GameError::AlreadyCompleted));
        let after = GameTable::get_by_id_for_user(first.game.id, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.guesses_left, 3);

        // someone else's game id is not found
        let stranger = insert_user("other@example.com", "other").await;
        let err = submit_guess(
            Some(&stranger),
            GuessSubmission {
                game: GameRef::Persisted(first.game.id),
                text: "Abbey Road".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GameError::NotFound(_)));

        // exhaustion: five wrong guesses end the game without a win
        let exhausted_user = insert_user("loser@example.com", "loser").await;
        let loaded = match today_game(Some(&exhausted_user)).await.unwrap() {
            TodayGame::Persisted(loaded) => loaded,
            TodayGame::Ephemeral { .. } => panic!("expected a persisted game"),
        };
        let mut last = None;
        for i in 0..5 {
            let result = submit_guess(
                Some(&exhausted_user),
                GuessSubmission {
                    game: GameRef::Persisted(loaded.game.id),
                    text: format!("wrong {}", i),
                    album_hint: None,
                    guesses_left: None,
                    pixelation: None,
                },
            )
            .await
            .unwrap();
            if let GuessResult::Persisted { loaded, .. } = result {
                last = Some(loaded);
            }
        }
        let last = last.unwrap();
        assert_eq!(last.game.guesses_left, 0);
        assert!(last.game.is_completed);
        assert!(!last.game.is_won);

        // anonymous flow: ephemeral game, client-echoed album
        let (eph_id, eph_album) = match today_game(None).await.unwrap() {
            TodayGame::Ephemeral { id, album } => (id, album),
            TodayGame::Persisted(_) => panic!("expected an ephemeral game"),
        };
        assert!(eph_id.starts_with("temp_"));

        let result = submit_guess(
            None,
            GuessSubmission {
                game: GameRef::Ephemeral(eph_id.clone()),
                text: eph_album.title.to_uppercase(),
                album_hint: Some(hint(&eph_album.title)),
                guesses_left: Some(5),
                pixelation: Some(7),
            },
        )
        .await
        .unwrap();
        match result {
            GuessResult::Ephemeral { state, guess } => {
                assert!(guess.is_correct);
                assert!(state.is_won);
                assert_eq!(state.guesses_left, 4);
                assert_eq!(state.pixelation, 6);
            }
            GuessResult::Persisted { .. } => panic!("expected an ephemeral result"),
        }

        // anonymous guess without the album echo is invalid
        let err = submit_guess(
            None,
            GuessSubmission {
                game: GameRef::Ephemeral(eph_id),
                text: "whatever".to_string(),
                album_hint: None,
                guesses_left: None,
                pixelation: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));

        // history pagination: 15 games -> page 2 of limit 10 holds 5
        let historian = insert_user("history@example.com", "historian").await;
        for i in 0..15 {
            GameTable::create_for_day(historian.id, album_id, &format!("2026-01-{:02}", i + 1))
                .await
                .unwrap();
        }
        let page = history(&historian, 2, 10).await.unwrap();
        assert_eq!(page.games.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.pages, 2);

        let page1 = history(&historian, 1, 10).await.unwrap();
        assert_eq!(page1.games.len(), 10);
        // newest first
        assert!(page1.games[0].game.id > page1.games[9].game.id);

        // anonymous games never show up in anyone's history
        let own = history(&user, 1, 10).await.unwrap();
        assert_eq!(own.total, 1);
    }
}

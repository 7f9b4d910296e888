use chrono::Datelike;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    clock::Clock,
    errors::AppError,
    models::game::Game,
    pagination::LimitOffset,
    payloads::{GameFilter, NewGame},
    repositories::game_repo,
};

const FIRST_RELEASE_YEAR: i64 = 1970;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePage {
    pub total: i64,
    pub count: usize,
    pub games: Vec<Game>,
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidField {
            field,
            reason: "is required",
        });
    }
    if value.chars().count() > max {
        return Err(AppError::InvalidField {
            field,
            reason: "is too long",
        });
    }
    Ok(value.to_string())
}

/// Trims the text fields, drops a blank description and checks the limits.
fn normalize(payload: NewGame, current_year: i64) -> Result<NewGame, AppError> {
    let name = required("name", &payload.name, 100)?;
    let genre = required("genre", &payload.genre, 50)?;
    if let Some(year) = payload.release_year {
        if year < FIRST_RELEASE_YEAR {
            return Err(AppError::InvalidField {
                field: "releaseYear",
                reason: "must be 1970 or later",
            });
        }
        if year > current_year + 1 {
            return Err(AppError::InvalidField {
                field: "releaseYear",
                reason: "cannot be in the future",
            });
        }
    }
    if payload.min_players < 1 {
        return Err(AppError::InvalidField {
            field: "minPlayers",
            reason: "must be at least 1",
        });
    }
    if payload.max_players < 1 {
        return Err(AppError::InvalidField {
            field: "maxPlayers",
            reason: "must be at least 1",
        });
    }
    if payload.min_players > payload.max_players {
        return Err(AppError::InvalidField {
            field: "minPlayers",
            reason: "cannot exceed maxPlayers",
        });
    }
    let description = payload
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if description.as_ref().is_some_and(|d| d.chars().count() > 500) {
        return Err(AppError::InvalidField {
            field: "description",
            reason: "is too long",
        });
    }
    Ok(NewGame {
        name,
        genre,
        description,
        ..payload
    })
}

pub async fn create_game(
    pool: &SqlitePool,
    clock: &dyn Clock,
    payload: NewGame,
) -> Result<Game, AppError> {
    let now = clock.now();
    let game = normalize(payload, i64::from(now.year()))?;
    let game = game_repo::create_game(pool, &game, now.timestamp()).await?;
    tracing::info!("game {} ({}) added to the catalogue", game.id, game.name);
    Ok(game)
}

pub async fn get_game(pool: &SqlitePool, id: i64) -> Result<Game, AppError> {
    game_repo::get_game(pool, id)
        .await?
        .ok_or(AppError::GameNotFound(id))
}

pub async fn list_games(pool: &SqlitePool, filter: GameFilter) -> Result<GamePage, AppError> {
    let page = LimitOffset::new(filter.limit, filter.offset);
    let genre = filter.genre.as_deref().filter(|g| !g.is_empty());
    let total = game_repo::count_games(pool, genre).await?;
    let games = game_repo::list_games(pool, genre, page).await?;
    Ok(GamePage {
        total,
        count: games.len(),
        games,
    })
}

/// Replaces every field of the game; there is no partial update.
pub async fn replace_game(
    pool: &SqlitePool,
    clock: &dyn Clock,
    id: i64,
    payload: NewGame,
) -> Result<Game, AppError> {
    let game = normalize(payload, i64::from(clock.now().year()))?;
    game_repo::replace_game(pool, id, &game)
        .await?
        .ok_or(AppError::GameNotFound(id))
}

pub async fn remove_game(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    if game_repo::delete_game(pool, id).await? == 0 {
        return Err(AppError::GameNotFound(id));
    }
    tracing::info!("game {} removed from the catalogue", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;

    use super::*;

    // 2027-01-15
    const NOW: i64 = 1_800_000_000;

    fn game(name: &str, min_players: i64, max_players: i64) -> NewGame {
        NewGame {
            name: name.to_string(),
            genre: "FPS".to_string(),
            release_year: Some(2023),
            min_players,
            max_players,
            description: Some("  ".to_string()),
        }
    }

    #[sqlx::test]
    async fn test_create_game_normalizes_fields(pool: SqlitePool) {
        let created = create_game(&pool, &FixedClock::at(NOW), game("  Valorant ", 2, 10))
            .await
            .expect("failed to create game");
        assert_eq!(created.name, "Valorant");
        assert_eq!(created.description, None);
        assert_eq!(created.created_at, NOW);
        let fetched = get_game(&pool, created.id).await.expect("game exists");
        assert_eq!(fetched.max_players, 10);
    }

    #[sqlx::test]
    async fn test_rejects_invalid_games(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        assert!(matches!(
            create_game(&pool, &clock, game("Valorant", 6, 2)).await,
            Err(AppError::InvalidField {
                field: "minPlayers",
                ..
            })
        ));
        assert!(matches!(
            create_game(&pool, &clock, game("", 1, 2)).await,
            Err(AppError::InvalidField { field: "name", .. })
        ));
        let ancient = NewGame {
            release_year: Some(1962),
            ..game("Spacewar!", 2, 2)
        };
        assert!(matches!(
            create_game(&pool, &clock, ancient).await,
            Err(AppError::InvalidField {
                field: "releaseYear",
                ..
            })
        ));
        let upcoming = NewGame {
            release_year: Some(2028),
            ..game("Next Big Shooter", 2, 10)
        };
        create_game(&pool, &clock, upcoming)
            .await
            .expect("next year's releases are accepted");
        let far_future = NewGame {
            release_year: Some(2029),
            ..game("Vaporware", 2, 10)
        };
        assert!(create_game(&pool, &clock, far_future).await.is_err());
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("games")))]
    async fn test_list_games_by_genre(pool: SqlitePool) {
        let page = list_games(
            &pool,
            GameFilter {
                genre: Some("FPS".to_string()),
                limit: Some(1),
                offset: None,
            },
        )
        .await
        .expect("failed to list games");
        assert_eq!(page.total, 2);
        assert_eq!(page.count, 1);
        assert_eq!(page.games[0].name, "Counter-Strike 2");

        let all = list_games(&pool, GameFilter::default())
            .await
            .expect("failed to list games");
        assert_eq!(all.total, 4);
        assert_eq!(all.count, 4);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("games")))]
    async fn test_replace_and_remove(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let replaced = replace_game(&pool, &clock, 2, game("Dota 2", 2, 10)).await;
        let replaced = replaced.expect("failed to replace game");
        assert_eq!(replaced.name, "Dota 2");
        assert_eq!(replaced.genre, "FPS");
        assert_eq!(replaced.created_at, 1_700_000_000);

        assert!(matches!(
            replace_game(&pool, &clock, 99, game("Dota 2", 2, 10)).await,
            Err(AppError::GameNotFound(99))
        ));
        remove_game(&pool, 2).await.expect("failed to remove game");
        assert!(matches!(
            get_game(&pool, 2).await,
            Err(AppError::GameNotFound(2))
        ));
        assert!(matches!(
            remove_game(&pool, 2).await,
            Err(AppError::GameNotFound(2))
        ));
    }
}

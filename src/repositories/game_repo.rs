use sqlx::SqliteExecutor;

use crate::{models::game::Game, pagination::LimitOffset, payloads::NewGame};

pub async fn create_game<'e>(
    executor: impl SqliteExecutor<'e>,
    game: &NewGame,
    now: i64,
) -> sqlx::Result<Game> {
    sqlx::query_as(
        "insert into games
            (name, genre, release_year, min_players, max_players, description, created_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            returning *",
    )
    .bind(&game.name)
    .bind(&game.genre)
    .bind(game.release_year)
    .bind(game.min_players)
    .bind(game.max_players)
    .bind(&game.description)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn get_game<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Game>> {
    sqlx::query_as("select * from games where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_games<'e>(
    executor: impl SqliteExecutor<'e>,
    genre: Option<&str>,
    page: LimitOffset,
) -> sqlx::Result<Vec<Game>> {
    sqlx::query_as(
        "select * from games
            where (?1 is null or genre = ?1)
            order by name asc
            limit ?2 offset ?3",
    )
    .bind(genre)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_games<'e>(
    executor: impl SqliteExecutor<'e>,
    genre: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar("select count(*) from games where (?1 is null or genre = ?1)")
        .bind(genre)
        .fetch_one(executor)
        .await
}

pub async fn replace_game<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    game: &NewGame,
) -> sqlx::Result<Option<Game>> {
    sqlx::query_as(
        "update games set
            name = ?1,
            genre = ?2,
            release_year = ?3,
            min_players = ?4,
            max_players = ?5,
            description = ?6
        where id = ?7
        returning *",
    )
    .bind(&game.name)
    .bind(&game.genre)
    .bind(game.release_year)
    .bind(game.min_players)
    .bind(game.max_players)
    .bind(&game.description)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_game<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from games where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("games")))]
    async fn test_genre_filter_and_ordering(pool: sqlx::SqlitePool) {
        let shooters = list_games(&pool, Some("FPS"), LimitOffset::default())
            .await
            .expect("failed to list games");
        let names: Vec<&str> = shooters.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Counter-Strike 2", "Quake III Arena"]);
        assert_eq!(count_games(&pool, None).await.expect("failed to count"), 4);
        assert_eq!(
            count_games(&pool, Some("Racing")).await.expect("failed to count"),
            0
        );
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("games")))]
    async fn test_replace_missing_game_returns_none(pool: sqlx::SqlitePool) {
        let game = NewGame {
            name: "Tetris".to_string(),
            genre: "Puzzle".to_string(),
            release_year: None,
            min_players: 1,
            max_players: 1,
            description: None,
        };
        let replaced = replace_game(&pool, 99, &game)
            .await
            .expect("failed to run update");
        assert!(replaced.is_none());
    }
}

use serde::Serialize;
use sqlx::prelude::FromRow;

/// Catalogue entry; tournaments still name their game as free text.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub genre: String,
    pub release_year: Option<i64>,
    pub min_players: i64,
    pub max_players: i64,
    pub description: Option<String>,
    pub created_at: i64,
}

use sqlx::{SqliteExecutor, prelude::FromRow};

use crate::models::team::{Team, TeamMember};

pub async fn create_team<'e>(
    executor: impl SqliteExecutor<'e>,
    captain_id: i64,
    name: &str,
    tag: &str,
    now: i64,
) -> sqlx::Result<Team> {
    sqlx::query_as(
        "insert into teams (name, tag, captain_id, created_at) values (?1, ?2, ?3, ?4) returning *",
    )
    .bind(name)
    .bind(tag)
    .bind(captain_id)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn get_team<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Team>> {
    sqlx::query_as("select * from teams where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_teams<'e>(executor: impl SqliteExecutor<'e>) -> sqlx::Result<Vec<Team>> {
    sqlx::query_as("select * from teams order by name asc")
        .fetch_all(executor)
        .await
}

pub async fn update_team<'e>(executor: impl SqliteExecutor<'e>, team: &Team) -> sqlx::Result<Team> {
    sqlx::query_as("update teams set name = ?1, tag = ?2 where id = ?3 returning *")
        .bind(&team.name)
        .bind(&team.tag)
        .bind(team.id)
        .fetch_one(executor)
        .await
}

pub async fn delete_team<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from teams where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[derive(FromRow)]
pub struct DbTeamMember {
    pub team_id: i64,
    pub user_id: i64,
    pub username: String,
    pub is_captain: bool,
}

impl From<DbTeamMember> for TeamMember {
    fn from(value: DbTeamMember) -> Self {
        Self {
            user_id: value.user_id,
            username: value.username,
            is_captain: value.is_captain,
        }
    }
}

// The captain is always listed first, even without a team_members row.
const MEMBERS_QUERY: &str = "
    select t.id as team_id, u.id as user_id, u.username, 1 as is_captain, 0 as position
        from teams t
        inner join users u on u.id = t.captain_id
    union all
    select m.team_id, u.id as user_id, u.username, 0 as is_captain, m.joined_at as position
        from team_members m
        inner join teams t on t.id = m.team_id
        inner join users u on u.id = m.user_id
        where m.user_id <> t.captain_id";

pub async fn select_members<'e>(
    executor: impl SqliteExecutor<'e>,
    team_id: i64,
) -> sqlx::Result<Vec<DbTeamMember>> {
    let sql = format!(
        "select team_id, user_id, username, is_captain from ({})
            where team_id = ?1
            order by is_captain desc, position asc, user_id asc",
        MEMBERS_QUERY
    );
    sqlx::query_as(&sql).bind(team_id).fetch_all(executor).await
}

pub async fn select_all_members<'e>(
    executor: impl SqliteExecutor<'e>,
) -> sqlx::Result<Vec<DbTeamMember>> {
    let sql = format!(
        "select team_id, user_id, username, is_captain from ({})
            order by team_id asc, is_captain desc, position asc, user_id asc",
        MEMBERS_QUERY
    );
    sqlx::query_as(&sql).fetch_all(executor).await
}

pub async fn is_member<'e>(
    executor: impl SqliteExecutor<'e>,
    team_id: i64,
    user_id: i64,
) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "select exists(select 1 from team_members where team_id = ?1 and user_id = ?2)",
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn add_member<'e>(
    executor: impl SqliteExecutor<'e>,
    team_id: i64,
    user_id: i64,
    now: i64,
) -> sqlx::Result<()> {
    sqlx::query("insert into team_members (team_id, user_id, joined_at) values (?1, ?2, ?3)")
        .bind(team_id)
        .bind(user_id)
        .bind(now)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn remove_member<'e>(
    executor: impl SqliteExecutor<'e>,
    team_id: i64,
    user_id: i64,
) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from team_members where team_id = ?1 and user_id = ?2")
        .bind(team_id)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "teams")))]
    async fn test_captain_listed_first(pool: sqlx::SqlitePool) {
        let members = select_members(&pool, 2)
            .await
            .expect("failed to select members");
        let ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
        assert_eq!(ids, vec![7, 6]);
        assert!(members[0].is_captain);
        assert!(!members[1].is_captain);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "teams")))]
    async fn test_membership_roundtrip(pool: sqlx::SqlitePool) {
        assert!(!is_member(&pool, 1, 5).await.expect("failed to query"));
        add_member(&pool, 1, 5, 0).await.expect("failed to add member");
        assert!(is_member(&pool, 1, 5).await.expect("failed to query"));
        let all = select_all_members(&pool)
            .await
            .expect("failed to select members");
        assert_eq!(all.iter().filter(|m| m.team_id == 1).count(), 2);
        assert_eq!(remove_member(&pool, 1, 5).await.expect("failed to remove"), 1);
    }
}

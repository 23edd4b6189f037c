use crate::db::GetDb;
use crate::error::AppResult;
use crate::UserId;

use entrait::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Actor {
    pub groups: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

/// Group memberships and effective permissions of a user, `None` for an unknown user.
#[entrait(pub FindActor, mock_api=FindActorMock)]
async fn find_actor(deps: &impl GetDb, user_id: UserId) -> AppResult<Option<Actor>> {
    let pg_pool = &deps.get_db().pg_pool;
    let user_id = user_id.0;

    let exists: bool =
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM app.user WHERE user_id = $1)"#)
            .bind(user_id)
            .fetch_one(pg_pool)
            .await?;

    if !exists {
        return Ok(None);
    }

    let groups: Vec<String> = sqlx::query_scalar(
        r#"SELECT group_name FROM app.user_group WHERE user_id = $1 ORDER BY group_name"#,
    )
    .bind(user_id)
    .fetch_all(pg_pool)
    .await?;

    let permissions: Vec<String> = sqlx::query_scalar(
        // language=PostgreSQL
        r#"
        SELECT codename FROM app.user_permission WHERE user_id = $1
        UNION
        SELECT gp.codename FROM app.group_permission gp
        INNER JOIN app.user_group ug USING (group_name)
        WHERE ug.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pg_pool)
    .await?;

    Ok(Some(Actor {
        groups: groups.into_iter().collect(),
        permissions: permissions.into_iter().collect(),
    }))
}

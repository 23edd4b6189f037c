use crate::db::{DbResultExt, GetDb};
use crate::error::{AppError, AppResult};
use crate::profile::form::{NewProfile, ProfileChanges};
use crate::profile::search::SearchTerm;
use crate::profile::{Profile, ProfileId};
use crate::UserId;

use entrait::*;
use time::OffsetDateTime;
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "profile_id, user_id, nickname, login, age, about, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProfileRow {
    profile_id: i64,
    user_id: Uuid,
    nickname: String,
    login: String,
    age: Option<i32>,
    about: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: ProfileId(row.profile_id),
            owner: UserId(row.user_id),
            nickname: row.nickname,
            login: row.login,
            age: row.age,
            about: row.about,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// All profiles whose nickname or login contains `search`, ignoring case.
#[entrait(pub SelectProfiles, mock_api=SelectProfilesMock)]
async fn select_profiles(deps: &impl GetDb, search: Option<SearchTerm>) -> AppResult<Vec<Profile>> {
    let pattern = search.as_ref().map(SearchTerm::contains_pattern);

    let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
        // language=PostgreSQL
        r#"
        SELECT {PROFILE_COLUMNS} FROM app.profile
        WHERE $1::text IS NULL OR nickname ILIKE $1 OR login ILIKE $1
        ORDER BY profile_id
        "#
    ))
    .bind(pattern)
    .fetch_all(&deps.get_db().pg_pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

#[entrait(pub FindProfile, mock_api=FindProfileMock)]
async fn find_profile(deps: &impl GetDb, id: ProfileId) -> AppResult<Option<Profile>> {
    let row: Option<ProfileRow> = sqlx::query_as(&format!(
        r#"SELECT {PROFILE_COLUMNS} FROM app.profile WHERE profile_id = $1"#
    ))
    .bind(id.0)
    .fetch_optional(&deps.get_db().pg_pool)
    .await?;

    Ok(row.map(Into::into))
}

#[entrait(pub InsertProfile, mock_api=InsertProfileMock)]
async fn insert_profile(
    deps: &impl GetDb,
    owner: UserId,
    profile: NewProfile,
) -> AppResult<Profile> {
    let row: ProfileRow = sqlx::query_as(&format!(
        // language=PostgreSQL
        r#"
        INSERT INTO app.profile (user_id, nickname, login, age, about)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(owner.0)
    .bind(profile.nickname)
    .bind(profile.login)
    .bind(profile.age)
    .bind(profile.about)
    .fetch_one(&deps.get_db().pg_pool)
    .await
    .on_constraint("profile_login_key", |_| AppError::LoginTaken)?;

    Ok(row.into())
}

/// Apply `changes` to a profile. The owner column is never written.
#[entrait(pub UpdateProfile, mock_api=UpdateProfileMock)]
async fn update_profile(
    deps: &impl GetDb,
    id: ProfileId,
    changes: ProfileChanges,
) -> AppResult<Profile> {
    let row: Option<ProfileRow> = sqlx::query_as(&format!(
        // language=PostgreSQL
        r#"
        UPDATE app.profile SET
            nickname = COALESCE($1, nickname),
            login = COALESCE($2, login),
            age = CASE WHEN $3::boolean THEN $4::int ELSE age END,
            about = COALESCE($5, about),
            updated_at = now()
        WHERE profile_id = $6
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(changes.nickname)
    .bind(changes.login)
    .bind(changes.age.is_some())
    .bind(changes.age.flatten())
    .bind(changes.about)
    .bind(id.0)
    .fetch_optional(&deps.get_db().pg_pool)
    .await
    .on_constraint("profile_login_key", |_| AppError::LoginTaken)?;

    row.map(Into::into).ok_or(AppError::ProfileNotFound)
}

#[entrait(pub RemoveProfile, mock_api=RemoveProfileMock)]
async fn remove_profile(deps: &impl GetDb, id: ProfileId) -> AppResult<()> {
    let result = sqlx::query(r#"DELETE FROM app.profile WHERE profile_id = $1"#)
        .bind(id.0)
        .execute(&deps.get_db().pg_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ProfileNotFound);
    }

    Ok(())
}

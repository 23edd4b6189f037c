use crate::error::AppError;

use anyhow::Context;
use entrait::*;
use sqlx::error::DatabaseError;
use sqlx::PgPool;

pub mod actor_db;
pub mod profile_db;

#[derive(Clone)]
pub struct Db {
    pub pg_pool: PgPool,
}

impl Db {
    pub async fn init(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pg_pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("could not connect to database_url")?;

        sqlx::migrate!("./migrations").run(&pg_pool).await?;

        Ok(Db { pg_pool })
    }
}

#[entrait(pub GetDb, mock_api=GetDbMock)]
fn get_db(db: &Db) -> &Db {
    db
}

trait DbResultExt<T> {
    fn on_constraint(
        self,
        name: &str,
        f: impl FnOnce(Box<dyn DatabaseError>) -> AppError,
    ) -> Result<T, AppError>;
}

impl<T, E> DbResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn on_constraint(
        self,
        name: &str,
        map_err: impl FnOnce(Box<dyn DatabaseError>) -> AppError,
    ) -> Result<T, AppError> {
        self.map_err(|e| match e.into() {
            AppError::Sqlx(sqlx::Error::Database(dbe)) if dbe.constraint() == Some(name) => {
                map_err(dbe)
            }
            e => e,
        })
    }
}

#[cfg(test)]
async fn create_test_db() -> Db {
    use sha2::Digest;
    use sqlx::Connection;

    let mut hasher = sha2::Sha256::new();
    hasher.update(std::thread::current().name().unwrap().as_bytes());
    let thread_hash = hex::encode(hasher.finalize());
    let db_name = &thread_hash[0..24];

    let mut url = database_server_url();
    let mut connection = sqlx::PgConnection::connect(url.as_str()).await.unwrap();

    sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{}""#, db_name))
        .execute(&mut connection)
        .await
        .expect("failed to drop");

    sqlx::query(&format!(r#"CREATE DATABASE "{}""#, db_name))
        .execute(&mut connection)
        .await
        .expect("failed creating test database");

    url.set_path(db_name);

    let pg_pool = sqlx::PgPool::connect(url.as_str())
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .expect("Failed to migrate");

    Db { pg_pool }
}

#[cfg(test)]
fn database_server_url() -> url::Url {
    // (re)load the .env file
    dotenv::dotenv().ok();

    let mut url: url::Url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set")
        .parse()
        .expect("malformed DATABASE_URL");

    if let Ok(mut path) = url.path_segments_mut() {
        path.clear();
    }

    url
}

#[cfg(test)]
async fn insert_test_user(db: &Db, username: &str) -> crate::UserId {
    crate::UserId(
        sqlx::query_scalar::<_, uuid::Uuid>(r#"INSERT INTO app.user (username) VALUES ($1) RETURNING user_id"#)
            .bind(username)
            .fetch_one(&db.pg_pool)
            .await
            .expect("failed to insert test user"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_db_deps<D>()
    where
        D: GetDb
            + profile_db::SelectProfiles
            + profile_db::FindProfile
            + profile_db::InsertProfile
            + profile_db::UpdateProfile
            + profile_db::RemoveProfile
            + actor_db::FindActor,
    {
    }

    #[test]
    fn unimock_should_stand_in_for_the_database() {
        assert_db_deps::<unimock::Unimock>();
    }
}

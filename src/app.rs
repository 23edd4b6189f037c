use crate::config::Config;
use crate::db::{Db, GetDb};

use entrait::*;
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub db: Db,
}

impl GetDb for Impl<App> {
    fn get_db(&self) -> &Db {
        &self.db
    }
}

#[entrait(pub GetJwtSigningKey, mock_api=GetJwtSigningKeyMock)]
fn get_jwt_signing_key(app: &App) -> hmac::Hmac<sha2::Sha384> {
    app.config.jwt_signing_key.0.clone()
}

#[entrait(pub GetCurrentTime, mock_api=GetCurrentTimeMock)]
fn get_current_time(_: &App) -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(test)]
pub mod test {
    use super::*;
    use unimock::*;

    pub fn mock_jwt_signing_key() -> impl unimock::Clause {
        use hmac::Mac;

        GetJwtSigningKeyMock.each_call(matching!()).returns(
            hmac::Hmac::<sha2::Sha384>::new_from_slice("foobar".as_bytes())
                .expect("HMAC-SHA-384 can accept any key length"),
        )
    }

    pub fn mock_current_time() -> impl unimock::Clause {
        GetCurrentTimeMock
            .each_call(matching!())
            .returns(OffsetDateTime::from_unix_timestamp(0).unwrap())
    }

    pub fn mock_app_basics() -> impl unimock::Clause {
        (mock_jwt_signing_key(), mock_current_time())
    }
}

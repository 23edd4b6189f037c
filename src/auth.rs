use crate::app::{GetCurrentTime, GetJwtSigningKey};
use crate::error::{AppError, AppResult};
use crate::UserId;

use axum_extra::TypedHeader;
use entrait::*;
use headers::authorization::Credentials;
use headers::Authorization;
use http::HeaderValue;
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use uuid::Uuid;

const DEFAULT_SESSION_LENGTH: time::Duration = time::Duration::weeks(2);

#[derive(serde::Serialize, serde::Deserialize)]
struct AuthUserClaims {
    user_id: Uuid,
    /// Standard JWT `exp` claim.
    exp: i64,
}

/// Issue a session token for a user.
///
/// Logging in is the business of the surrounding application,
/// which signs with the same key that this service verifies with.
#[entrait(pub SignUserId, mock_api=SignUserIdMock)]
fn sign_user_id(deps: &(impl GetCurrentTime + GetJwtSigningKey), user_id: UserId) -> String {
    AuthUserClaims {
        user_id: user_id.0,
        exp: (deps.get_current_time() + DEFAULT_SESSION_LENGTH).unix_timestamp(),
    }
    .sign_with_key(&deps.get_jwt_signing_key())
    .expect("HMAC signing should be infallible")
}

#[entrait(pub Authenticate, mock_api=AuthenticateMock)]
pub mod authenticate {
    use super::*;

    pub fn authenticate(
        deps: &(impl GetCurrentTime + GetJwtSigningKey),
        token: Token,
    ) -> AppResult<UserId> {
        let jwt = jwt::Token::<jwt::Header, AuthUserClaims, _>::parse_unverified(token.token())
            .map_err(|_| AppError::Unauthorized)?;

        let jwt = jwt
            .verify_with_key(&deps.get_jwt_signing_key())
            .map_err(|_| AppError::Unauthorized)?;
        let (_header, claims) = jwt.into();

        if claims.exp < deps.get_current_time().unix_timestamp() {
            tracing::debug!("expired token for user {}", claims.user_id);
            return Err(AppError::Unauthorized);
        }

        Ok(UserId(claims.user_id))
    }
}

///
/// Data for `Token` authorization scheme.
///
#[derive(Debug)]
pub struct Token(String);

impl Token {
    pub fn from_token(token: &str) -> Self {
        Self(format!("Token {token}"))
    }

    pub fn token(&self) -> &str {
        self.0.get("Token ".len()..).unwrap_or_default()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.token()
    }
}

impl Credentials for Token {
    const SCHEME: &'static str = "Token";

    fn decode(value: &HeaderValue) -> Option<Self> {
        let auth_header = value.to_str().ok()?;

        Some(Token(auth_header.to_string()))
    }

    fn encode(&self) -> HeaderValue {
        HeaderValue::from_str(&self.0).unwrap()
    }
}

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Token
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(token)) =
            TypedHeader::<Authorization<Token>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;

        Ok(token)
    }
}

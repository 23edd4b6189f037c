use crate::auth::{Authenticate, Token};
use crate::db::actor_db::FindActor;
use crate::error::{AppError, AppResult};
use crate::UserId;

use entrait::*;
use std::collections::BTreeSet;

/// Who is acting in the current request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub groups: BTreeSet<String>,
    /// Effective permission codenames, direct grants and group grants combined.
    pub permissions: BTreeSet<String>,
}

#[entrait(pub ResolveContext, mock_api=ResolveContextMock)]
async fn resolve_context(
    deps: &(impl Authenticate + FindActor),
    token: Token,
) -> AppResult<RequestContext> {
    let user_id = deps.authenticate(token)?;
    let actor = deps.find_actor(user_id.clone()).await?.ok_or_else(|| {
        tracing::info!("token refers to unknown user {}", user_id.0);
        AppError::Unauthorized
    })?;

    Ok(RequestContext {
        user_id,
        groups: actor.groups,
        permissions: actor.permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticate::AuthenticateMock;
    use crate::db::actor_db::{Actor, FindActorMock};

    use assert_matches::*;
    use unimock::*;
    use uuid::Uuid;

    fn test_user_id() -> UserId {
        UserId(Uuid::from_u128(42))
    }

    #[tokio::test]
    async fn should_collect_groups_and_permissions() {
        let deps = Unimock::new((
            AuthenticateMock::authenticate
                .next_call(matching!(_))
                .returns(Ok(test_user_id())),
            FindActorMock.next_call(matching!(_)).returns(Ok(Some(Actor {
                groups: ["admin_application".to_string()].into(),
                permissions: ["add_profile".to_string()].into(),
            }))),
        ));

        let ctx = resolve_context(&deps, Token::from_token("t0k3n"))
            .await
            .unwrap();

        assert_eq!(test_user_id(), ctx.user_id);
        assert!(ctx.groups.contains("admin_application"));
        assert!(ctx.permissions.contains("add_profile"));
    }

    #[tokio::test]
    async fn unknown_user_should_be_unauthorized() {
        let deps = Unimock::new((
            AuthenticateMock::authenticate
                .next_call(matching!(_))
                .returns(Ok(test_user_id())),
            FindActorMock.next_call(matching!(_)).returns(Ok(None)),
        ));

        assert_matches!(
            resolve_context(&deps, Token::from_token("t0k3n")).await,
            Err(AppError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn invalid_token_should_not_touch_the_database() {
        let deps = Unimock::new(
            AuthenticateMock::authenticate
                .next_call(matching!(_))
                .returns(Err(AppError::Unauthorized)),
        );

        assert_matches!(
            resolve_context(&deps, Token::from_token("t0k3n")).await,
            Err(AppError::Unauthorized)
        );
    }
}

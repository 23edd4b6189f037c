//! Ownership and permission decisions for profile mutations.
//!
//! Everything here is a pure function of the acting user, the target profile
//! and the actor's group memberships. Callers evaluate the decision before any
//! state change and bail out with [AppError::Forbidden] on [Decision::Deny].

use crate::context::RequestContext;
use crate::error::{AppError, AppResult};
use crate::profile::Profile;
use crate::UserId;

use std::collections::BTreeSet;

/// Members of this group may edit and delete any profile.
pub const ADMIN_GROUP: &str = "admin_application";

/// Permission codename required for creating profiles.
pub const ADD_PROFILE: &str = "add_profile";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// `Deny` becomes `AppError::Forbidden`.
    pub fn or_forbidden(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AppError::Forbidden),
        }
    }
}

/// May `actor` edit or delete `profile`?
pub fn authorize_mutation(
    actor: &UserId,
    profile: &Profile,
    groups: &BTreeSet<String>,
) -> Decision {
    if *actor == profile.owner || groups.contains(ADMIN_GROUP) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Evaluate [authorize_mutation] for the current request.
pub fn ensure_can_mutate(ctx: &RequestContext, profile: &Profile) -> AppResult<()> {
    let decision = authorize_mutation(&ctx.user_id, profile, &ctx.groups);
    if !decision.is_allowed() {
        tracing::info!(
            "user {} may not modify profile {}",
            ctx.user_id.0,
            profile.id.0
        );
    }
    decision.or_forbidden()
}

pub fn require_permission(ctx: &RequestContext, codename: &str) -> AppResult<()> {
    if ctx.permissions.contains(codename) {
        Ok(())
    } else {
        tracing::info!("user {} lacks permission {codename}", ctx.user_id.0);
        Err(AppError::Forbidden)
    }
}

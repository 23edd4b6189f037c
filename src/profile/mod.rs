pub mod form;
pub mod search;

use crate::access;
use crate::context::RequestContext;
use crate::db::profile_db::{
    FindProfile, InsertProfile, RemoveProfile, SelectProfiles, UpdateProfile,
};
use crate::error::{AppError, AppResult};
use crate::message::Notice;
use crate::UserId;
use form::{ProfileEditForm, ProfileForm};
use search::SearchTerm;

use entrait::*;
use time::OffsetDateTime;

pub const DELETED_MESSAGE: &str = "Successful deleted";

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    /// Set at creation, never changed afterwards.
    pub owner: UserId,
    pub nickname: String,
    pub login: String,
    pub age: Option<i32>,
    pub about: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(serde::Deserialize, Default, Debug, Eq, PartialEq)]
#[serde(default)]
pub struct ListProfilesQuery {
    pub search: Option<String>,
}

#[entrait(pub ProfileApi, mock_api=ProfileApiMock)]
pub mod api {
    use super::*;

    pub async fn list_profiles(
        deps: &impl SelectProfiles,
        query: ListProfilesQuery,
    ) -> AppResult<Vec<Profile>> {
        deps.select_profiles(SearchTerm::parse(query.search.as_deref()))
            .await
    }

    pub async fn fetch_profile(deps: &impl FindProfile, id: ProfileId) -> AppResult<Profile> {
        deps.find_profile(id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    pub async fn create_profile(
        deps: &impl InsertProfile,
        ctx: &RequestContext,
        form: ProfileForm,
    ) -> AppResult<Profile> {
        access::require_permission(ctx, access::ADD_PROFILE)?;
        let new_profile = form.validate()?;

        let profile = deps.insert_profile(ctx.user_id.clone(), new_profile).await?;
        tracing::info!("user {} created profile {}", ctx.user_id.0, profile.id.0);
        Ok(profile)
    }

    pub async fn edit_profile(
        deps: &(impl FindProfile + UpdateProfile),
        ctx: &RequestContext,
        id: ProfileId,
        form: ProfileEditForm,
    ) -> AppResult<Profile> {
        let profile = fetch_profile(deps, id).await?;
        let changes = form.validate()?;
        access::ensure_can_mutate(ctx, &profile)?;

        deps.update_profile(profile.id, changes).await
    }

    pub async fn delete_profile(
        deps: &(impl FindProfile + RemoveProfile),
        ctx: &RequestContext,
        id: ProfileId,
    ) -> AppResult<Vec<Notice>> {
        let profile = fetch_profile(deps, id).await?;
        access::ensure_can_mutate(ctx, &profile)?;

        deps.remove_profile(profile.id).await?;
        tracing::info!("user {} deleted profile {}", ctx.user_id.0, profile.id.0);

        Ok(vec![Notice::success(DELETED_MESSAGE)])
    }
}

use crate::auth::Token;
use crate::context::ResolveContext;
use crate::error::{AppError, AppResult};
use crate::message::Notice;
use crate::profile::form::{ProfileEditForm, ProfileForm};
use crate::profile::{ListProfilesQuery, Profile, ProfileApi, ProfileId};

use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct ProfileBody<T = Profile> {
    profile: T,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MultipleProfilesBody {
    profiles: Vec<Profile>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MessagesBody {
    messages: Vec<Notice>,
}

/// An id that is not a number names no profile.
fn profile_id(path: Result<Path<i64>, PathRejection>) -> AppResult<ProfileId> {
    path.map(|Path(id)| ProfileId(id))
        .map_err(|_| AppError::ProfileNotFound)
}

pub struct ProfileRoutes<D>(std::marker::PhantomData<D>);

impl<D> ProfileRoutes<D>
where
    D: ProfileApi + ResolveContext + Sized + Clone + Send + Sync + 'static,
{
    pub fn router() -> Router {
        Router::new()
            .route("/profiles/", get(Self::list_profiles))
            .route("/profiles/add/", post(Self::create_profile))
            .route("/profiles/show/:id", get(Self::get_profile))
            .route(
                "/profiles/:id/edit",
                put(Self::edit_profile).post(Self::edit_profile),
            )
            .route(
                "/profiles/:id/delete",
                post(Self::delete_profile).delete(Self::delete_profile),
            )
    }

    async fn list_profiles(
        Extension(deps): Extension<D>,
        Query(query): Query<ListProfilesQuery>,
    ) -> AppResult<Json<MultipleProfilesBody>> {
        Ok(Json(MultipleProfilesBody {
            profiles: deps.list_profiles(query).await?,
        }))
    }

    async fn get_profile(
        Extension(deps): Extension<D>,
        path: Result<Path<i64>, PathRejection>,
    ) -> AppResult<Json<ProfileBody>> {
        let id = profile_id(path)?;
        Ok(Json(ProfileBody {
            profile: deps.fetch_profile(id).await?,
        }))
    }

    async fn create_profile(
        Extension(deps): Extension<D>,
        token: Token,
        Json(body): Json<ProfileBody<ProfileForm>>,
    ) -> AppResult<(StatusCode, Json<ProfileBody>)> {
        let ctx = deps.resolve_context(token).await?;
        Ok((
            StatusCode::CREATED,
            Json(ProfileBody {
                profile: deps.create_profile(&ctx, body.profile).await?,
            }),
        ))
    }

    async fn edit_profile(
        Extension(deps): Extension<D>,
        token: Token,
        path: Result<Path<i64>, PathRejection>,
        Json(body): Json<ProfileBody<ProfileEditForm>>,
    ) -> AppResult<Json<ProfileBody>> {
        let id = profile_id(path)?;
        let ctx = deps.resolve_context(token).await?;
        Ok(Json(ProfileBody {
            profile: deps.edit_profile(&ctx, id, body.profile).await?,
        }))
    }

    async fn delete_profile(
        Extension(deps): Extension<D>,
        token: Token,
        path: Result<Path<i64>, PathRejection>,
    ) -> AppResult<Json<MessagesBody>> {
        let id = profile_id(path)?;
        let ctx = deps.resolve_context(token).await?;
        Ok(Json(MessagesBody {
            messages: deps.delete_profile(&ctx, id).await?,
        }))
    }
}

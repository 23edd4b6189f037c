mod profile_api;

use crate::app::App;

use entrait::Impl;

/// Axum API router for the real app.
pub fn api_router() -> axum::Router {
    profile_api::ProfileRoutes::<Impl<App>>::router()
}

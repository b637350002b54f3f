//! Category route handlers.

use axum::extract::State;
use tracing::instrument;

use crate::commerce::conversions::{CategoryView, convert_categories};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

use super::Notify;

/// Category listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<axum::Json<Notify<Vec<CategoryView>>>> {
    let ok = state.commerce().categories_list(auth.bearer()).await?;
    Ok(Notify::data(convert_categories(ok.data)))
}

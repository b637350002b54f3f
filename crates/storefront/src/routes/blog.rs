//! Blog route handlers (marketing content, read-only).

use axum::extract::{Path, State};
use tracing::instrument;

use crate::commerce::conversions::{BlogPostView, convert_blog_post, convert_blog_posts};
use crate::error::Result;
use crate::state::AppState;

use super::Notify;

/// Published posts.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<axum::Json<Notify<Vec<BlogPostView>>>> {
    let ok = state.commerce().blog_list().await?;
    Ok(Notify::data(convert_blog_posts(ok.data)))
}

/// One post by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<axum::Json<Notify<BlogPostView>>> {
    let ok = state.commerce().blog_get(&slug).await?;
    Ok(Notify::data(convert_blog_post(ok.data)))
}

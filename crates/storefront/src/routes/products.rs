//! Product route handlers.

use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use saffron_core::{CategoryId, ProductId};

use crate::checkout::FieldError;
use crate::commerce::ProductQuery;
use crate::commerce::conversions::{
    ProductView, ReviewView, convert_product, convert_products, convert_reviews,
};
use crate::error::Result;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

use super::{Notify, load_mirror};

/// Product listing query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

fn validate_review(form: &ReviewForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !(1..=5).contains(&form.rating) {
        errors.push(FieldError {
            field: "rating",
            message: "rating must be between 1 and 5".to_string(),
        });
    }
    if form.comment.trim().is_empty() {
        errors.push(FieldError {
            field: "comment",
            message: "comment is required".to_string(),
        });
    }
    errors
}

/// Product listing, flags decorated from the session's mirror.
#[instrument(skip(state, session, auth))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Query(params): Query<ListParams>,
) -> Result<axum::Json<Notify<Vec<ProductView>>>> {
    let query = ProductQuery {
        page: params.page,
        category: params.category,
        search: params.search,
    };

    let ok = state.commerce().products_list(auth.bearer(), &query).await?;

    let mirror = load_mirror(&session).await;
    let mut views = convert_products(ok.data, chrono::Utc::now());
    for view in &mut views {
        (view.in_cart, view.in_wishlist) = mirror.membership(&view.id);
    }

    Ok(Notify::data(views))
}

/// Product detail.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<axum::Json<Notify<ProductView>>> {
    let ok = state.commerce().product_get(auth.bearer(), &id).await?;

    let mirror = load_mirror(&session).await;
    let mut view = convert_product(ok.data, chrono::Utc::now());
    (view.in_cart, view.in_wishlist) = mirror.membership(&view.id);

    Ok(Notify::data(view))
}

/// Reviews for a product.
#[instrument(skip(state, auth))]
pub async fn reviews(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<axum::Json<Notify<Vec<ReviewView>>>> {
    let ok = state.commerce().reviews_list(auth.bearer(), &id).await?;
    Ok(Notify::data(convert_reviews(ok.data)))
}

/// Submit a review for a product.
#[instrument(skip(state, auth, form))]
pub async fn submit_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProductId>,
    Json(form): Json<ReviewForm>,
) -> axum::Json<Notify<serde_json::Value>> {
    let errors = validate_review(&form);
    if !errors.is_empty() {
        return Notify::invalid("Please check your review.", errors);
    }

    match state
        .commerce()
        .review_submit(auth.bearer(), &id, form.rating, form.comment.trim())
        .await
    {
        Ok(ok) => Notify::message(ok.notification("Thanks for your review!")),
        Err(e) => {
            tracing::error!("Failed to submit review: {e}");
            Notify::fail(e.notification())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_validation_bounds() {
        let ok = ReviewForm {
            rating: 4,
            comment: "Lovely aroma".to_string(),
        };
        assert!(validate_review(&ok).is_empty());

        let zero = ReviewForm {
            rating: 0,
            comment: "x".to_string(),
        };
        assert_eq!(validate_review(&zero).len(), 1);

        let six = ReviewForm {
            rating: 6,
            comment: "x".to_string(),
        };
        assert_eq!(
            validate_review(&six).first().map(|e| e.field),
            Some("rating")
        );
    }

    #[test]
    fn test_review_requires_comment() {
        let blank = ReviewForm {
            rating: 5,
            comment: "   ".to_string(),
        };
        assert_eq!(
            validate_review(&blank).first().map(|e| e.field),
            Some("comment")
        );
    }
}

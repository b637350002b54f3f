//! Category, review, and blog conversion functions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use saffron_core::{CategoryId, ReviewId};

use super::super::types::{BlogPost, Category, Review};

/// A category ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

/// A review ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: ReviewId,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A blog post ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostView {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Convert a category listing.
#[must_use]
pub fn convert_categories(categories: Vec<Category>) -> Vec<CategoryView> {
    categories
        .into_iter()
        .map(|c| CategoryView {
            id: c.id,
            name: c.name,
            image: c.image,
        })
        .collect()
}

/// Convert a review listing.
#[must_use]
pub fn convert_reviews(reviews: Vec<Review>) -> Vec<ReviewView> {
    reviews
        .into_iter()
        .map(|r| ReviewView {
            id: r.id,
            author: r.user_name,
            rating: r.rating.min(5),
            comment: r.comment,
            posted_at: r.created_at,
        })
        .collect()
}

/// Convert one blog post.
#[must_use]
pub fn convert_blog_post(post: BlogPost) -> BlogPostView {
    BlogPostView {
        slug: post.slug,
        title: post.title,
        body: post.body,
        published_at: post.published_at,
    }
}

/// Convert a blog listing.
#[must_use]
pub fn convert_blog_posts(posts: Vec<BlogPost>) -> Vec<BlogPostView> {
    posts.into_iter().map(convert_blog_post).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_rating_clamped_to_scale() {
        let reviews = convert_reviews(vec![Review {
            id: ReviewId::new("r1"),
            user_name: "Asha".to_string(),
            rating: 9,
            comment: "Great".to_string(),
            created_at: None,
        }]);
        assert_eq!(reviews.first().expect("review").rating, 5);
    }
}

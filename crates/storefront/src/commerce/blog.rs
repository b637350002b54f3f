//! Blog resource gateway (marketing content, read-only).

use reqwest::Method;
use tracing::instrument;

use super::types::BlogPost;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// List published blog posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self))]
    pub async fn blog_list(&self) -> Result<ApiOk<Vec<BlogPost>>, CommerceError> {
        self.send(Method::GET, "/blogs", None, None).await
    }

    /// Fetch one blog post by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the post does not exist or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn blog_get(&self, slug: &str) -> Result<ApiOk<BlogPost>, CommerceError> {
        let path = format!("/blogs/{}", urlencoding::encode(slug));
        self.send(Method::GET, &path, None, None).await
    }
}

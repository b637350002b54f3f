//! Catalog resource gateway: products and categories.
//!
//! The catalog is read-only from this service's perspective.

use reqwest::Method;
use tracing::instrument;

use saffron_core::{CategoryId, ProductId};

use super::types::{Category, Product};
use super::{ApiOk, CommerceClient, CommerceError};

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Restrict to a category.
    pub category: Option<CategoryId>,
    /// Free-text search term.
    pub search: Option<String>,
}

impl ProductQuery {
    fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page={page}"));
        }
        if let Some(category) = &self.category {
            parts.push(format!(
                "category={}",
                urlencoding::encode(category.as_str())
            ));
        }
        if let Some(search) = &self.search {
            parts.push(format!("search={}", urlencoding::encode(search)));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

impl CommerceClient {
    /// List products, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn products_list(
        &self,
        auth: Option<&str>,
        query: &ProductQuery,
    ) -> Result<ApiOk<Vec<Product>>, CommerceError> {
        let path = format!("/products{}", query.to_query_string());
        self.send(Method::GET, &path, auth, None).await
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self, auth), fields(product_id = %product_id))]
    pub async fn product_get(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
    ) -> Result<ApiOk<Product>, CommerceError> {
        let path = format!("/products/{}", urlencoding::encode(product_id.as_str()));
        self.send(Method::GET, &path, auth, None).await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn categories_list(
        &self,
        auth: Option<&str>,
    ) -> Result<ApiOk<Vec<Category>>, CommerceError> {
        self.send(Method::GET, "/categories", auth, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty() {
        assert_eq!(ProductQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_query_string_encodes_search() {
        let query = ProductQuery {
            page: Some(2),
            category: None,
            search: Some("masala chai".to_string()),
        };
        assert_eq!(query.to_query_string(), "?page=2&search=masala%20chai");
    }
}

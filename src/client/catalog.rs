use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::client::store::ProductSummary;

/// Public catalog the storefront reads product data from. Read-only and
/// unauthenticated; its availability is not under our control.
pub const DEFAULT_CATALOG_URL: &str = "https://api.escuelajs.co/api/v1";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<CatalogCategory>,
}

impl CatalogProduct {
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.title.clone(),
            price: self.price,
            images: self.images.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category_slug: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub async fn categories(&self) -> Result<Vec<CatalogCategory>, CatalogError> {
        let categories = self
            .http
            .get(format!("{}/categories", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(categories)
    }

    /// Filtered, paginated product listing. A category slug is resolved to
    /// the catalog's numeric category id first; an unknown slug just means no
    /// category filter.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut params: Vec<(&str, String)> = Vec::new();

        if let Some(slug) = query
            .category_slug
            .as_deref()
            .filter(|slug| *slug != "allproducts")
        {
            if let Some(category) = self.resolve_category(slug).await? {
                params.push(("categoryId", category.id.to_string()));
            }
        }
        if let Some(min) = query.price_min {
            params.push(("price_min", min.to_string()));
        }
        if let Some(max) = query.price_max {
            params.push(("price_max", max.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }

        let products = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(products)
    }

    pub async fn product(&self, id: i64) -> Result<CatalogProduct, CatalogError> {
        let product = self
            .http
            .get(format!("{}/products/{id}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(product)
    }

    pub async fn search(&self, title: &str) -> Result<Vec<CatalogProduct>, CatalogError> {
        let products = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(&[("title", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(products)
    }

    async fn resolve_category(&self, slug: &str) -> Result<Option<CatalogCategory>, CatalogError> {
        let categories = self.categories().await?;
        Ok(categories
            .into_iter()
            .find(|category| slugify(&category.name) == slug))
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_lowercases_and_joins_with_dashes() {
        assert_eq!(slugify("Home Decor"), "home-decor");
        assert_eq!(slugify("Electronics"), "electronics");
        assert_eq!(slugify("  Outdoor   Gear "), "outdoor-gear");
    }
}

//! Coupang Taiwan adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://www.tw.coupang.com/api/v1/search";
const SITE_ROOT: &str = "https://www.tw.coupang.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "rData")]
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    title: String,
    #[serde(rename = "salePrice")]
    sale_price: u64,
    #[serde(rename = "productUrl")]
    product_url: String,
}

pub struct CoupangPlatform {
    client: Client,
}

impl CoupangPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let url = format!(
            "{}?q={}&page=1&listSize={}",
            SEARCH_URL,
            urlencoding::encode(&params.query),
            params.max_results.max(1)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::Coupang, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::Coupang,
            detail: e.to_string(),
        })
    }
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    response
        .data
        .map(|d| d.products)
        .unwrap_or_default()
        .into_iter()
        .take(max_results)
        .map(|product| {
            // productUrl is site-relative
            let url = if product.product_url.starts_with("http") {
                product.product_url
            } else {
                format!("{}{}", SITE_ROOT, product.product_url)
            };
            Listing::new(SourceId::Coupang, product.title, product.sale_price, url)
        })
        .collect()
}

#[async_trait]
impl Platform for CoupangPlatform {
    fn id(&self) -> SourceId {
        SourceId::Coupang
    }

    fn description(&self) -> &'static str {
        "Coupang Taiwan search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "coupang returned listings");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_products_and_resolves_relative_urls() {
        let payload = r#"{
            "rData": {
                "products": [
                    {"title": "Apple AirPods Pro 2", "salePrice": 6990, "productUrl": "/products/123"},
                    {"title": "AirPods 4", "salePrice": 4590, "productUrl": "https://www.tw.coupang.com/products/456"}
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let listings = to_listings(response, 20);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].url, "https://www.tw.coupang.com/products/123");
        assert_eq!(listings[1].url, "https://www.tw.coupang.com/products/456");
        assert_eq!(listings[1].price, 4590);
    }

    #[test]
    fn null_rdata_is_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"rData": null}"#).unwrap();
        assert!(to_listings(response, 20).is_empty());
    }
}

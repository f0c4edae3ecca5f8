//! Rakuten Taiwan adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://www.rakuten.com.tw/api/search/products";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "itemName")]
    name: String,
    #[serde(rename = "itemPrice")]
    price: u64,
    #[serde(rename = "itemUrl")]
    url: String,
}

pub struct RakutenPlatform {
    client: Client,
}

impl RakutenPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let mut url = format!(
            "{}?q={}&hits={}&sort=%2BitemPrice",
            SEARCH_URL,
            urlencoding::encode(&params.query),
            params.max_results.max(1)
        );
        if params.min_price > 0 {
            url.push_str(&format!("&minPrice={}", params.min_price));
        }
        if params.max_price > 0 {
            url.push_str(&format!("&maxPrice={}", params.max_price));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::Rakuten, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::Rakuten,
            detail: e.to_string(),
        })
    }
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    response
        .items
        .into_iter()
        .take(max_results)
        .map(|item| Listing::new(SourceId::Rakuten, item.name, item.price, item.url))
        .collect()
}

#[async_trait]
impl Platform for RakutenPlatform {
    fn id(&self) -> SourceId {
        SourceId::Rakuten
    }

    fn description(&self) -> &'static str {
        "Rakuten Taiwan search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "rakuten returned listings");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items() {
        let payload = r#"{
            "items": [
                {"itemName": "索尼 50型", "itemPrice": 14000, "itemUrl": "https://www.rakuten.com.tw/shop/a/product/1"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let listings = to_listings(response, 20);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "索尼 50型");
        assert_eq!(listings[0].price, 14000);
        assert_eq!(listings[0].source, SourceId::Rakuten);
    }
}

//! Yahoo Shopping Taiwan adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://tw.buy.yahoo.com/api/v3/search/products";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    title: String,
    price: u64,
    link: String,
}

pub struct YahooShoppingPlatform {
    client: Client,
}

impl YahooShoppingPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let mut url = format!(
            "{}?q={}&rows={}&sort=price_asc",
            SEARCH_URL,
            urlencoding::encode(&params.query),
            params.max_results.max(1)
        );
        if params.min_price > 0 {
            url.push_str(&format!("&price_from={}", params.min_price));
        }
        if params.max_price > 0 {
            url.push_str(&format!("&price_to={}", params.max_price));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::YahooShopping, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::YahooShopping,
            detail: e.to_string(),
        })
    }
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    response
        .products
        .into_iter()
        .take(max_results)
        .map(|product| Listing::new(SourceId::YahooShopping, product.title, product.price, product.link))
        .collect()
}

#[async_trait]
impl Platform for YahooShoppingPlatform {
    fn id(&self) -> SourceId {
        SourceId::YahooShopping
    }

    fn description(&self) -> &'static str {
        "Yahoo Shopping Taiwan search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "yahoo shopping returned listings");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_products() {
        let payload = r#"{
            "products": [
                {"title": "SONY 50吋電視 BRAVIA", "price": 16500, "link": "https://tw.buy.yahoo.com/gdsale/1"},
                {"title": "SONY 55吋電視", "price": 19900, "link": "https://tw.buy.yahoo.com/gdsale/2"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let listings = to_listings(response, 1);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, 16500);
        assert!(listings[0].is_bid.is_none());
    }
}

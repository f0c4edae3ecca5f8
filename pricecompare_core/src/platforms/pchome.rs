//! PChome 24h search adapter.
//!
//! Uses the public search API at `ecshweb.pchome.com.tw`; results link back
//! to the 24h storefront.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://ecshweb.pchome.com.tw/search/v3.3/all/results";
const PROD_URL_PREFIX: &str = "https://24h.pchome.com.tw/prod/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    prods: Vec<Prod>,
}

#[derive(Debug, Deserialize)]
struct Prod {
    #[serde(rename = "Id")]
    id: String,
    name: String,
    price: u64,
}

pub struct PchomePlatform {
    client: Client,
}

impl PchomePlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let mut url = format!(
            "{}?q={}&page=1&sort=prc/ac",
            SEARCH_URL,
            urlencoding::encode(&params.query)
        );
        // The API accepts a server-side price window; the engine re-filters
        // locally either way.
        if params.min_price > 0 || params.max_price > 0 {
            let hi = if params.max_price > 0 {
                params.max_price.to_string()
            } else {
                String::new()
            };
            url.push_str(&format!("&price={}-{}", params.min_price, hi));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::Pchome, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::Pchome,
            detail: e.to_string(),
        })
    }
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    response
        .prods
        .into_iter()
        .take(max_results)
        .map(|prod| {
            let url = format!("{}{}", PROD_URL_PREFIX, prod.id);
            Listing::new(SourceId::Pchome, prod.name, prod.price, url)
        })
        .collect()
}

#[async_trait]
impl Platform for PchomePlatform {
    fn id(&self) -> SourceId {
        SourceId::Pchome
    }

    fn description(&self) -> &'static str {
        "PChome 24h shopping search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "pchome returned listings");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_payload() {
        let payload = r#"{
            "totalRows": 2,
            "prods": [
                {"Id": "DYAJDD-A900B7W4Y", "name": "SONY 50吋電視 4K", "price": 15000, "originPrice": 18900},
                {"Id": "DYAJDD-A900B7XYZ", "name": "SONY BRAVIA 50", "price": 21900}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let listings = to_listings(response, 20);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "SONY 50吋電視 4K");
        assert_eq!(listings[0].price, 15000);
        assert_eq!(listings[0].url, "https://24h.pchome.com.tw/prod/DYAJDD-A900B7W4Y");
        assert_eq!(listings[0].source, SourceId::Pchome);
        assert!(listings[0].is_bid.is_none());
    }

    #[test]
    fn honors_max_results_hint() {
        let payload = r#"{"prods": [
            {"Id": "a", "name": "x", "price": 1},
            {"Id": "b", "name": "y", "price": 2},
            {"Id": "c", "name": "z", "price": 3}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(to_listings(response, 2).len(), 2);
    }

    #[test]
    fn missing_prods_is_empty_not_error() {
        let response: SearchResponse = serde_json::from_str(r#"{"totalRows": 0}"#).unwrap();
        assert!(to_listings(response, 20).is_empty());
    }
}

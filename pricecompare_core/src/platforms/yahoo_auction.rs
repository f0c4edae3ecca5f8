//! Yahoo Auction Taiwan adapter.
//!
//! The only auction platform in the registered set. Every auction item has a
//! running bid price; some additionally carry a direct-buy price. Direct-buy
//! items surface as fixed-price listings (`is_bid = false`), open bids as
//! `is_bid = true` so the engine can gate them on `include_bids`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://tw.bid.yahoo.com/api/v1/search/auction";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<AuctionItem>,
}

#[derive(Debug, Deserialize)]
struct AuctionItem {
    title: String,
    #[serde(rename = "currentPrice")]
    current_price: u64,
    #[serde(rename = "buyNowPrice")]
    buy_now_price: Option<u64>,
    link: String,
}

pub struct YahooAuctionPlatform {
    client: Client,
}

impl YahooAuctionPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let url = format!(
            "{}?q={}&hits={}",
            SEARCH_URL,
            urlencoding::encode(&params.query),
            params.max_results.max(1)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::YahooAuction, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::YahooAuction,
            detail: e.to_string(),
        })
    }
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    response
        .items
        .into_iter()
        .take(max_results)
        .map(|item| match item.buy_now_price {
            Some(price) => {
                Listing::new(SourceId::YahooAuction, item.title, price, item.link).with_bid(false)
            }
            None => Listing::new(SourceId::YahooAuction, item.title, item.current_price, item.link)
                .with_bid(true),
        })
        .collect()
}

#[async_trait]
impl Platform for YahooAuctionPlatform {
    fn id(&self) -> SourceId {
        SourceId::YahooAuction
    }

    fn description(&self) -> &'static str {
        "Yahoo Auction Taiwan search"
    }

    fn auction_only(&self) -> bool {
        true
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "yahoo auction returned listings");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_bids_and_direct_buy_are_distinguished() {
        let payload = r#"{
            "items": [
                {"title": "SONY 50吋電視 二手", "currentPrice": 3200, "buyNowPrice": null, "link": "https://tw.bid.yahoo.com/item/1"},
                {"title": "SONY 50吋電視 全新", "currentPrice": 8000, "buyNowPrice": 13500, "link": "https://tw.bid.yahoo.com/item/2"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let listings = to_listings(response, 20);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, 3200);
        assert_eq!(listings[0].is_bid, Some(true));
        assert_eq!(listings[1].price, 13500);
        assert_eq!(listings[1].is_bid, Some(false));
    }
}

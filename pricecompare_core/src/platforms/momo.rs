//! momo shopping adapter.
//!
//! Talks to the mobile search cloud endpoint. Prices come back as display
//! strings ("1,5900"), so parsing goes through `parse_display_price`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{http_client, parse_display_price, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://apisearch.momoshop.com.tw/momoSearchCloud/moec/textSearch";
const GOODS_URL_PREFIX: &str = "https://www.momoshop.com.tw/goods/GoodsDetail.jsp?i_code=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "rtnSearchData")]
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "goodsInfoList", default)]
    goods: Vec<GoodsInfo>,
}

#[derive(Debug, Deserialize)]
struct GoodsInfo {
    #[serde(rename = "goodsCode")]
    code: String,
    #[serde(rename = "goodsName")]
    name: String,
    #[serde(rename = "goodsPrice")]
    price: String,
}

pub struct MomoPlatform {
    client: Client,
}

impl MomoPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, PlatformError> {
        let body = search_body(params);
        let response = self.client.post(SEARCH_URL).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::Momo, response.status()));
        }

        response.json().await.map_err(|e| PlatformError::Parse {
            source_id: SourceId::Momo,
            detail: e.to_string(),
        })
    }
}

/// Request body for the search cloud. Price bounds are sent only when the
/// caller enabled them; a disabled bound must not narrow the result set.
fn search_body(params: &SearchParams) -> serde_json::Value {
    let mut data = json!({
        "searchValue": params.query,
        "searchType": "1",
        "curPage": "1",
    });
    if params.min_price > 0 {
        data["priceS"] = json!(params.min_price.to_string());
    }
    if params.max_price > 0 {
        data["priceE"] = json!(params.max_price.to_string());
    }

    json!({
        "host": "momoshop",
        "flag": "searchEngine",
        "data": data,
    })
}

fn to_listings(response: SearchResponse, max_results: usize) -> Vec<Listing> {
    let goods = match response.data {
        Some(data) if response.success => data.goods,
        _ => Vec::new(),
    };

    goods
        .into_iter()
        .filter_map(|item| {
            let Some(price) = parse_display_price(&item.price) else {
                warn!(name = %item.name, raw = %item.price, "momo price not parseable, skipping");
                return None;
            };
            let url = format!("{}{}", GOODS_URL_PREFIX, item.code);
            Some(Listing::new(SourceId::Momo, item.name, price, url))
        })
        .take(max_results)
        .collect()
}

#[async_trait]
impl Platform for MomoPlatform {
    fn id(&self) -> SourceId {
        SourceId::Momo
    }

    fn description(&self) -> &'static str {
        "momo shopping search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let response = self.fetch(params).await?;
        let listings = to_listings(response, params.max_results);
        debug!(count = listings.len(), "momo returned listings");
        Ok(listings)
    }
}

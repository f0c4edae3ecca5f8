//! ETMall adapter.
//!
//! No public JSON search API, so this scrapes the search result page.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::{http_client, parse_display_price, status_error};
use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use crate::Platform;

const SEARCH_URL: &str = "https://www.etmall.com.tw/Search";
const SITE_ROOT: &str = "https://www.etmall.com.tw";

pub struct EtmallPlatform {
    client: Client,
}

impl EtmallPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    async fn fetch(&self, params: &SearchParams) -> Result<String, PlatformError> {
        let url = format!(
            "{}?keyword={}",
            SEARCH_URL,
            urlencoding::encode(&params.query)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(SourceId::Etmall, response.status()));
        }
        Ok(response.text().await?)
    }
}

fn parse_results(html: &str, max_results: usize) -> Vec<Listing> {
    let document = Html::parse_document(html);

    // Selectors are constant, parse cannot fail
    let item_sel = Selector::parse("div.product-item").unwrap();
    let link_sel = Selector::parse("a.product-link").unwrap();
    let name_sel = Selector::parse(".product-name").unwrap();
    let price_sel = Selector::parse(".price .amount").unwrap();

    let mut listings = Vec::new();
    for element in document.select(&item_sel).take(max_results) {
        let name = element
            .select(&name_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let price = element
            .select(&price_sel)
            .next()
            .and_then(|e| parse_display_price(&e.text().collect::<String>()));
        let href = element
            .select(&link_sel)
            .next()
            .and_then(|e| e.value().attr("href"));

        let (Some(price), Some(href)) = (price, href) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", SITE_ROOT, href)
        };
        listings.push(Listing::new(SourceId::Etmall, name, price, url));
    }
    listings
}

#[async_trait]
impl Platform for EtmallPlatform {
    fn id(&self) -> SourceId {
        SourceId::Etmall
    }

    fn description(&self) -> &'static str {
        "ETMall shopping search"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
        let html = self.fetch(params).await?;
        let listings = parse_results(&html, params.max_results);
        debug!(count = listings.len(), "etmall returned listings");
        Ok(listings)
    }
}

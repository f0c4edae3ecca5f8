//! Data model shared by the aggregation engine and the platform adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlatformError;

/// Identifier of a registered shopping platform.
///
/// The set is fixed at compile time; registration order (the order of
/// [`SourceId::ALL`]) is part of the ranking tie-break contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Pchome,
    Momo,
    Coupang,
    Etmall,
    Rakuten,
    YahooShopping,
    YahooAuction,
}

impl SourceId {
    pub const ALL: [SourceId; 7] = [
        SourceId::Pchome,
        SourceId::Momo,
        SourceId::Coupang,
        SourceId::Etmall,
        SourceId::Rakuten,
        SourceId::YahooShopping,
        SourceId::YahooAuction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Pchome => "pchome",
            SourceId::Momo => "momo",
            SourceId::Coupang => "coupang",
            SourceId::Etmall => "etmall",
            SourceId::Rakuten => "rakuten",
            SourceId::YahooShopping => "yahoo_shopping",
            SourceId::YahooAuction => "yahoo_auction",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PlatformError::UnknownSource(s.to_string()))
    }
}

/// One candidate product returned by a platform.
///
/// Immutable once built: the pipeline either keeps or discards a listing,
/// it never rewrites one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Display name as the platform renders it (often mixed CJK/Latin).
    pub name: String,

    /// Price in the platform's currency (TWD across the registered set).
    pub price: u64,

    /// Link to the product page.
    pub url: String,

    /// Originating platform.
    pub source: SourceId,

    /// True when the price is a live auction bid rather than a fixed price.
    /// Only auction-capable platforms set this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bid: Option<bool>,
}

impl Listing {
    pub fn new(
        source: SourceId,
        name: impl Into<String>,
        price: u64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            url: url.into(),
            source,
            is_bid: None,
        }
    }

    pub fn with_bid(mut self, is_bid: bool) -> Self {
        self.is_bid = Some(is_bid);
        self
    }

    /// Whether this listing represents an open auction bid.
    pub fn is_auction_bid(&self) -> bool {
        self.is_bid == Some(true)
    }
}

/// Required-word expression over a listing name.
///
/// AND across groups, OR within a group. An empty expression matches
/// everything. Matching semantics live in [`crate::filters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequireWords(pub Vec<Vec<String>>);

impl RequireWords {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.0
    }
}

impl From<Vec<Vec<String>>> for RequireWords {
    fn from(groups: Vec<Vec<String>>) -> Self {
        Self(groups)
    }
}

/// Parameters of one query, shared by both aggregation entry points and the
/// platform adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-form product description ("SONY 50吋電視").
    pub query: String,

    /// Cap on returned listings; also passed to adapters as a fetch hint.
    pub max_results: usize,

    /// Inclusive lower price bound, 0 = disabled.
    pub min_price: u64,

    /// Inclusive upper price bound, 0 = disabled.
    pub max_price: u64,

    /// Required-word expression applied to listing names.
    pub require_words: RequireWords,

    /// Include live auction bids (and auction-only platforms).
    pub include_bids: bool,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 20,
            min_price: 0,
            max_price: 0,
            require_words: RequireWords::default(),
            include_bids: false,
        }
    }
}

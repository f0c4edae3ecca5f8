//! Platform adapters, one module per shopping site.
//!
//! Each adapter turns one site's search endpoint into `Listing` records and
//! shapes its failures into `PlatformError`. Retrieval details (endpoints,
//! payload shapes, anti-bot headers) stay inside the adapter; the engine
//! only sees the `Platform` trait.

#[cfg(feature = "coupang")]
pub mod coupang;
#[cfg(feature = "etmall")]
pub mod etmall;
#[cfg(feature = "momo")]
pub mod momo;
#[cfg(feature = "pchome")]
pub mod pchome;
#[cfg(feature = "rakuten")]
pub mod rakuten;
#[cfg(feature = "yahoo-auction")]
pub mod yahoo_auction;
#[cfg(feature = "yahoo-shopping")]
pub mod yahoo_shopping;

use crate::error::PlatformError;
use crate::model::SourceId;

/// Browser-ish UA; several of these sites refuse the default reqwest agent.
#[allow(dead_code)]
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[allow(dead_code)]
pub(crate) fn http_client() -> Result<reqwest::Client, PlatformError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(PlatformError::HttpRequest)
}

/// Map an unsuccessful HTTP status to the right error shape.
#[allow(dead_code)]
pub(crate) fn status_error(source: SourceId, status: reqwest::StatusCode) -> PlatformError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        PlatformError::RateLimited(source)
    } else {
        PlatformError::UpstreamStatus { source_id: source, status }
    }
}

/// Parse a displayed price like `"15,900"` or `"$1,299"` into an integer.
#[allow(dead_code)]
pub(crate) fn parse_display_price(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_price_parsing() {
        assert_eq!(parse_display_price("15,900"), Some(15900));
        assert_eq!(parse_display_price("$1,299"), Some(1299));
        assert_eq!(parse_display_price("NT$ 450"), Some(450));
        assert_eq!(parse_display_price("free"), None);
        assert_eq!(parse_display_price(""), None);
    }
}

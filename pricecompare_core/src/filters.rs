//! Per-listing filters applied after the fan-out barrier.
//!
//! Adapters may push the same constraints server-side as an optimization,
//! but platform-side filtering is not trusted: every surviving listing is
//! re-checked here before ranking.

use crate::model::{Listing, RequireWords, SearchParams};

/// Inclusive price-range check. A bound of 0 is the disabled sentinel.
///
/// Inverted enabled bounds (`min > max`) reject every price. Callers that
/// want to treat that as a usage error must do so before querying; the
/// filter itself never fails.
pub fn in_range(price: u64, min_price: u64, max_price: u64) -> bool {
    if min_price > 0 && price < min_price {
        return false;
    }
    if max_price > 0 && price > max_price {
        return false;
    }
    true
}

/// Required-word check: AND across groups, OR within a group.
///
/// Case-insensitive substring containment, no tokenization, so mixed
/// CJK/Latin names match without word boundaries ("索尼" inside
/// "索尼 50型"). An empty expression matches everything.
pub fn matches_require_words(name: &str, require_words: &RequireWords) -> bool {
    if require_words.is_empty() {
        return true;
    }
    let lowered = name.to_lowercase();
    require_words.groups().iter().all(|group| {
        group
            .iter()
            .any(|term| lowered.contains(&term.to_lowercase()))
    })
}

/// Combined per-listing gate used by both aggregation entry points:
/// price range, required words, and the auction-bid exclusion rule.
pub fn passes(listing: &Listing, params: &SearchParams) -> bool {
    if listing.is_auction_bid() && !params.include_bids {
        return false;
    }
    in_range(listing.price, params.min_price, params.max_price)
        && matches_require_words(&listing.name, &params.require_words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceId;

    #[test]
    fn range_with_both_bounds_disabled() {
        assert!(in_range(0, 0, 0));
        assert!(in_range(u64::MAX, 0, 0));
    }

    #[test]
    fn range_min_only() {
        // max disabled: survivors are 10000 and 20000
        assert!(!in_range(5000, 10000, 0));
        assert!(in_range(10000, 10000, 0));
        assert!(in_range(20000, 10000, 0));
    }

    #[test]
    fn range_max_only() {
        assert!(in_range(5000, 0, 10000));
        assert!(in_range(10000, 0, 10000));
        assert!(!in_range(10001, 0, 10000));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(in_range(100, 100, 200));
        assert!(in_range(200, 100, 200));
        assert!(!in_range(99, 100, 200));
        assert!(!in_range(201, 100, 200));
    }

    #[test]
    fn inverted_bounds_reject_everything() {
        for price in [0, 9999, 10000, 15000, 20000, 20001] {
            assert!(!in_range(price, 20000, 10000));
        }
    }

    #[test]
    fn empty_expression_matches_anything() {
        assert!(matches_require_words("whatever", &RequireWords::default()));
        assert!(matches_require_words("", &RequireWords::default()));
    }

    #[test]
    fn and_across_groups_or_within_group() {
        let words = RequireWords::from(vec![
            vec!["SONY".to_string(), "索尼".to_string()],
            vec!["50".to_string()],
        ]);

        assert!(matches_require_words("SONY 50吋電視 4K", &words));
        assert!(matches_require_words("索尼 50型", &words));
        // passes group one, fails group two
        assert!(!matches_require_words("SONY 65吋電視", &words));
        // fails group one
        assert!(!matches_require_words("國際牌 50吋電視", &words));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let words = RequireWords::from(vec![vec!["sony".to_string()]]);
        assert!(matches_require_words("SONY Bravia", &words));

        let words = RequireWords::from(vec![vec!["AirPods".to_string()]]);
        assert!(matches_require_words("apple airpods pro 2", &words));
    }

    #[test]
    fn cjk_substring_without_word_boundaries() {
        let words = RequireWords::from(vec![vec!["電視".to_string()]]);
        assert!(matches_require_words("SONY50吋電視4K", &words));
    }

    #[test]
    fn bid_listings_gated_by_include_bids() {
        let bid = Listing::new(SourceId::YahooAuction, "SONY 50", 100, "u").with_bid(true);
        let fixed = Listing::new(SourceId::YahooAuction, "SONY 50", 100, "u").with_bid(false);

        let mut params = SearchParams::new("SONY 50");
        assert!(!passes(&bid, &params));
        assert!(passes(&fixed, &params));

        params.include_bids = true;
        assert!(passes(&bid, &params));
    }

    #[test]
    fn passes_applies_both_filters() {
        let listing = Listing::new(SourceId::Pchome, "SONY 50吋電視 4K", 15000, "u");

        let mut params = SearchParams::new("tv");
        params.require_words = RequireWords::from(vec![vec!["SONY".to_string()]]);
        assert!(passes(&listing, &params));

        params.min_price = 16000;
        assert!(!passes(&listing, &params));
    }
}

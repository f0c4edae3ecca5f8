//! TOON encoding of listing sequences.
//!
//! Tabular, token-efficient text for LLM consumption: a header row naming
//! the row count and field set, then one indented comma-separated row per
//! listing. Values that would be ambiguous in a bare cell are JSON-string
//! quoted.

use crate::model::Listing;

const FIXED_FIELDS: &[&str] = &["name", "price", "url", "source"];

/// Encode listings as a TOON table.
///
/// The `is_bid` column is emitted only when at least one listing carries
/// the flag, so fixed-price queries stay compact.
pub fn encode_listings(listings: &[Listing]) -> String {
    let with_bid_column = listings.iter().any(|l| l.is_bid.is_some());

    let mut fields: Vec<&str> = FIXED_FIELDS.to_vec();
    if with_bid_column {
        fields.push("is_bid");
    }

    let mut out = format!("[{}]{{{}}}:", listings.len(), fields.join(","));
    for listing in listings {
        out.push_str("\n  ");
        out.push_str(&encode_cell(&listing.name));
        out.push(',');
        out.push_str(&listing.price.to_string());
        out.push(',');
        out.push_str(&encode_cell(&listing.url));
        out.push(',');
        out.push_str(listing.source.as_str());
        if with_bid_column {
            out.push(',');
            match listing.is_bid {
                Some(bid) => out.push_str(if bid { "true" } else { "false" }),
                None => out.push_str("null"),
            }
        }
    }
    out
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(' ')
        || value.ends_with(' ')
        || value.contains([',', '"', '\n', '\r'])
}

fn encode_cell(value: &str) -> String {
    if needs_quoting(value) {
        // serde_json string escaping doubles as TOON quoting
        serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceId;

    fn listing(name: &str, price: u64) -> Listing {
        Listing::new(SourceId::Pchome, name, price, "https://p.example/1")
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(encode_listings(&[]), "[0]{name,price,url,source}:");
    }

    #[test]
    fn plain_rows() {
        let listings = vec![listing("索尼 50型", 14000), listing("SONY 50吋電視 4K", 15000)];
        let toon = encode_listings(&listings);
        assert_eq!(
            toon,
            "[2]{name,price,url,source}:\n  \
             索尼 50型,14000,https://p.example/1,pchome\n  \
             SONY 50吋電視 4K,15000,https://p.example/1,pchome"
        );
    }

    #[test]
    fn commas_in_names_are_quoted() {
        let toon = encode_listings(&[listing("TV, 50 inch", 9)]);
        assert!(toon.contains("\"TV, 50 inch\",9,"));
    }

    #[test]
    fn padded_names_are_quoted() {
        // sites do ship names with padding, see the scraped fixtures
        let toon = encode_listings(&[listing(" SONY 50吋電視 ", 9)]);
        assert!(toon.contains("\n  \" SONY 50吋電視 \",9,"));
    }

    #[test]
    fn quotes_and_newlines_are_escaped() {
        let toon = encode_listings(&[listing("50\" TV", 9), listing("two\nlines", 8)]);
        assert!(toon.contains("\"50\\\" TV\",9,"));
        assert!(toon.contains("\"two\\nlines\",8,"));
        // the escaped newline must not break the one-row-per-line layout
        assert_eq!(toon.lines().count(), 3);
    }

    #[test]
    fn empty_name_is_quoted() {
        let toon = encode_listings(&[listing("", 9)]);
        assert!(toon.contains("\n  \"\",9,"));
    }

    #[test]
    fn bid_column_only_when_flag_present() {
        let fixed = vec![listing("a", 1)];
        assert!(!encode_listings(&fixed).contains("is_bid"));

        let mixed = vec![
            listing("a", 1),
            Listing::new(SourceId::YahooAuction, "b", 2, "u").with_bid(true),
        ];
        let toon = encode_listings(&mixed);
        assert!(toon.starts_with("[2]{name,price,url,source,is_bid}:"));
        assert!(toon.contains("a,1,https://p.example/1,pchome,null"));
        assert!(toon.contains("b,2,u,yahoo_auction,true"));
    }
}

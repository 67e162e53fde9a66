//! Result listing candidates.

use serde::{Deserialize, Deserializer, Serialize};

/// A candidate result item found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCandidate {
    pub title: String,
    /// Numeric prices are kept as their decimal text.
    #[serde(default, deserialize_with = "price_text")]
    pub price: Option<String>,
    /// Absolute URI of the item's detail page.
    pub link: String,
    /// Selector that activates the item.
    #[serde(rename = "selector")]
    pub target: String,
    #[serde(rename = "matches_specs")]
    pub matches_intent: bool,
}

fn price_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Price>::deserialize(deserializer)?.map(|price| match price {
        Price::Text(text) => text,
        Price::Number(number) => number.to_string(),
    }))
}

/// Keep the candidates flagged as matching; if none are flagged, keep the
/// first `limit` regardless of flag.
pub fn select_listings(candidates: Vec<ListingCandidate>, limit: usize) -> Vec<ListingCandidate> {
    if candidates.iter().any(|c| c.matches_intent) {
        candidates.into_iter().filter(|c| c.matches_intent).collect()
    } else {
        candidates.into_iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, matches: bool) -> ListingCandidate {
        ListingCandidate {
            title: title.to_string(),
            price: None,
            link: format!("https://shop.example/{}", title),
            target: format!("a[href='/{}']", title),
            matches_intent: matches,
        }
    }

    #[test]
    fn test_select_prefers_matching() {
        let selected = select_listings(
            vec![candidate("a", false), candidate("b", true), candidate("c", true)],
            5,
        );
        let titles: Vec<&str> = selected.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn test_numeric_price_becomes_text() {
        let parsed: Vec<ListingCandidate> = serde_json::from_str(
            r#"[
                {"title": "iPhone 15", "price": 799, "link": "/a", "selector": "a", "matches_specs": true},
                {"title": "iPhone 15 Pro", "price": 999.5, "link": "/b", "selector": "b", "matches_specs": true},
                {"title": "Case", "price": "$49", "link": "/c", "selector": "c", "matches_specs": false},
                {"title": "Strap", "price": null, "link": "/d", "selector": "d", "matches_specs": false},
                {"title": "Cable", "link": "/e", "selector": "e", "matches_specs": false}
            ]"#,
        )
        .unwrap();
        let prices: Vec<Option<&str>> = parsed.iter().map(|c| c.price.as_deref()).collect();
        assert_eq!(
            prices,
            vec![Some("799"), Some("999.5"), Some("$49"), None, None]
        );
    }

    #[test]
    fn test_select_falls_back_to_prefix() {
        let candidates = (0..8).map(|i| candidate(&i.to_string(), false)).collect();
        let selected = select_listings(candidates, 5);
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[0].title, "0");
    }

    #[test]
    fn test_select_empty() {
        assert!(select_listings(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_candidate_wire_names() {
        let value = serde_json::to_value(candidate("x", true)).unwrap();
        assert_eq!(value["matches_specs"], true);
        assert_eq!(value["selector"], "a[href='/x']");
    }
}

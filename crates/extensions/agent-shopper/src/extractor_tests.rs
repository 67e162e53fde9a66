use super::*;
use pathfinder_protocols::testing::{MockInference, MockReply};
use crate::sites::SiteSelector;
use pathfinder_config::SiteEntry;

fn extractor(client: MockInference) -> (SpecificationExtractor, Arc<MockInference>) {
    let client = Arc::new(client);
    (
        SpecificationExtractor::new(client.clone(), Duration::from_secs(5)),
        client,
    )
}

#[test]
fn test_fallback_storage_and_color() {
    let intent = fallback_intent("iPhone 15 Pro 256GB white");
    assert_eq!(intent.subject, "iPhone 15 Pro 256GB white");
    assert_eq!(intent.attribute("storage"), Some("256GB"));
    assert_eq!(intent.attribute("color"), Some("white"));
    assert_eq!(intent.attribute("model"), Some("15 pro"));
    assert!(intent.qualifier.is_none());
    assert!(intent.target_site.is_none());
}

#[test]
fn test_fallback_attribute_order() {
    let intent = fallback_intent("Galaxy 1 TB black 24 plus");
    let names: Vec<&str> = intent.attributes.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["storage", "color", "model"]);
    assert_eq!(intent.attribute("storage"), Some("1 TB"));
}

#[test]
fn test_fallback_brand_capitalized() {
    let intent = fallback_intent("samsung galaxy s24");
    assert_eq!(intent.qualifier.as_deref(), Some("Samsung"));
    assert!(intent.attributes.is_empty());
}

#[test]
fn test_fallback_empty_input() {
    let intent = fallback_intent("");
    assert_eq!(intent.subject, "");
    assert!(intent.attributes.is_empty());
    assert!(intent.qualifier.is_none());
}

#[tokio::test]
async fn test_extract_uses_inference_reply() {
    let (extractor, client) = extractor(MockInference::replying(
        r#"```json
{"product_name": "iPhone 15 Pro", "brand": "Apple",
 "specifications": {"storage": "256GB", "screen": 6.1, "refurbished": false, "note": null},
 "website": ""}
```"#,
    ));
    let intent = extractor.extract("iphone 15 pro 256 gb").await;
    assert_eq!(intent.subject, "iPhone 15 Pro");
    assert_eq!(intent.qualifier.as_deref(), Some("Apple"));
    assert_eq!(intent.attribute("screen"), Some("6.1"));
    assert_eq!(intent.attribute("refurbished"), Some("false"));
    assert!(intent.attribute("note").is_none());
    assert!(intent.target_site.is_none());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_extract_falls_back_on_quota() {
    let (extractor, _) = extractor(MockInference::quota_exhausted());
    let intent = extractor.extract("iPhone 15 Pro 256GB white").await;
    assert_eq!(intent.attribute("storage"), Some("256GB"));
    assert!(intent.qualifier.is_none());
}

#[tokio::test]
async fn test_extract_falls_back_on_network_error() {
    let (extractor, _) = extractor(MockInference::new(MockReply::NetworkError));
    let intent = extractor.extract("sony headphones").await;
    assert_eq!(intent.qualifier.as_deref(), Some("Sony"));
}

#[tokio::test]
async fn test_extract_falls_back_on_malformed_reply() {
    let (extractor, _) = extractor(MockInference::replying("{\"brand\": \"Apple\"}"));
    let intent = extractor.extract("apple watch").await;
    assert_eq!(intent.subject, "apple watch");
    assert_eq!(intent.qualifier.as_deref(), Some("Apple"));
}

#[tokio::test]
async fn test_extract_empty_input_skips_service() {
    let (extractor, client) = extractor(MockInference::replying("{}"));
    let intent = extractor.extract("   ").await;
    assert_eq!(intent.subject, "   ");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_extract_keeps_site_named_by_user() {
    let (extractor, _) = extractor(MockInference::replying(
        r#"{"product_name": "Galaxy S24", "brand": "Samsung", "website": "https://www.bestbuy.com/"}"#,
    ));
    let intent = extractor.extract("galaxy s24 on bestbuy.com").await;
    assert_eq!(intent.target_site.as_deref(), Some("https://www.bestbuy.com/"));
}

#[tokio::test]
async fn test_extract_drops_unrequested_site() {
    let (extractor, _) = extractor(MockInference::replying(
        r#"{"product_name": "iPhone 15", "brand": "Apple", "website": "https://www.apple.com"}"#,
    ));
    let intent = extractor.extract("apple iphone 15").await;
    assert!(intent.target_site.is_none());

    let selector = SiteSelector::new(&[SiteEntry {
        brand: "Apple".to_string(),
        url: "https://apple.reseller.example".to_string(),
    }]);
    assert_eq!(
        selector.select(&intent).as_deref(),
        Some("https://apple.reseller.example")
    );
}

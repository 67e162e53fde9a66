use super::*;
use pathfinder_protocols::testing::{Interaction, MockDocument, MockInference, MockPage};
use pathfinder_protocols::TaskStatus;

fn fast_config() -> Config {
    let mut config = Config::default();
    config.locator.direct_wait_ms = 1;
    config.locator.primed_wait_ms = 1;
    config.locator.opener_settle_ms = 0;
    config.pipeline.input_wait_ms = 1;
    config.pipeline.submit_wait_ms = 1;
    config.pipeline.settle_after_navigation_ms = 0;
    config.pipeline.settle_after_search_ms = 0;
    config
}

fn orchestrator() -> Orchestrator {
    Orchestrator::new(&fast_config(), Arc::new(MockInference::quota_exhausted()))
}

#[tokio::test]
async fn test_unknown_site_stops_before_navigation() {
    let doc = MockDocument::blank();
    let outcome = orchestrator()
        .execute(&doc, &TaskInput::new("wooden chair"))
        .await;

    assert_eq!(outcome.result.status, TaskStatus::Error);
    assert_eq!(
        outcome.result.message,
        "Could not determine website for the product."
    );
    assert!(outcome.result.data.is_empty());
    assert_eq!(
        outcome.step_names(),
        vec![steps::EXTRACT_SPEC, steps::SELECT_SITE]
    );
    assert!(!outcome.steps[1].is_success());
    assert!(doc.interactions().is_empty());
}

#[tokio::test]
async fn test_navigation_failure() {
    let doc = MockDocument::blank().with_failing_navigation("https://www.samsung.com");
    let outcome = orchestrator()
        .execute(&doc, &TaskInput::new("samsung galaxy s24"))
        .await;

    assert_eq!(
        outcome.result.message,
        "Failed to navigate to website: https://www.samsung.com"
    );
    assert_eq!(outcome.steps.last().unwrap().action_name, steps::NAVIGATE);
    assert!(!outcome.step_names().contains(&steps::SEARCH));
}

#[tokio::test]
async fn test_unavailable_document() {
    let doc = MockDocument::blank().with_unavailable_surface();
    let result = orchestrator()
        .run(&doc, &TaskInput::new("sony headphones"))
        .await;

    assert!(!result.is_success());
    assert_eq!(result.message, "Browser page not available");
}

#[tokio::test]
async fn test_search_failure_uses_deep_link_and_continues() {
    let doc = MockDocument::blank()
        .with_page("https://www.apple.com", MockPage::new("<p>welcome</p>"))
        .with_page(
            "https://www.apple.com/us/shop/goto/iphone",
            MockPage::new(r#"<a href="/shop/buy-iphone/iphone-15-pro">Buy iPhone 15 Pro</a>"#),
        );
    let outcome = orchestrator()
        .execute(&doc, &TaskInput::new("iPhone 15 Pro"))
        .await;

    assert!(outcome.result.is_success());
    assert_eq!(outcome.result.data["search_executed"], false);
    assert_eq!(
        outcome.result.data["products"][0]["link"],
        "https://www.apple.com/shop/buy-iphone/iphone-15-pro"
    );
    assert!(doc.interactions().contains(&Interaction::Navigate(
        "https://www.apple.com/us/shop/goto/iphone".to_string()
    )));
    let search = &outcome.steps[3];
    assert_eq!(search.action_name, steps::SEARCH);
    assert!(!search.is_success());
    assert_eq!(
        search.payload["fallback_url"],
        "https://www.apple.com/us/shop/goto/iphone"
    );
    assert_eq!(
        outcome.step_names(),
        vec![
            steps::EXTRACT_SPEC,
            steps::SELECT_SITE,
            steps::NAVIGATE,
            steps::SEARCH,
            steps::EXTRACT_LISTINGS,
            steps::DONE,
        ]
    );
}

#[tokio::test]
async fn test_no_deep_link_for_other_sites() {
    let doc = MockDocument::blank().with_page("https://www.nike.com", MockPage::new(""));
    let outcome = orchestrator()
        .execute(&doc, &TaskInput::new("nike air max"))
        .await;

    assert!(outcome.result.is_success());
    assert_eq!(outcome.result.message, "Found 0 products");
    assert_eq!(
        doc.interactions(),
        vec![Interaction::Navigate("https://www.nike.com".to_string())]
    );
}

#[test]
fn test_deep_link_rule() {
    assert_eq!(
        deep_link("https://www.apple.com/", "iPhone 15").as_deref(),
        Some("https://www.apple.com/us/shop/goto/iphone")
    );
    assert!(deep_link("https://www.apple.com", "iPad Air").is_none());
    assert!(deep_link("https://www.samsung.com", "iphone case").is_none());
}

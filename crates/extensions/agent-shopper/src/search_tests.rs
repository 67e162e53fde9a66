use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use pathfinder_locator::Strategy;
use pathfinder_protocols::testing::{Interaction, MockDocument, MockPage};
use pathfinder_protocols::{LocateMethod, LocateResult, StrategyError};

/// Always resolves to a fixed target.
struct Fixed(LocateResult);

#[async_trait]
impl Strategy for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn method(&self) -> LocateMethod {
        LocateMethod::DirectMatch
    }

    fn budget(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn attempt(
        &self,
        _doc: &dyn DocumentPort,
        _request: &LocateRequest,
    ) -> Result<LocateResult, StrategyError> {
        Ok(self.0.clone())
    }
}

fn executor(result: LocateResult) -> SearchExecutor {
    let cascade = LocatorCascade::new(vec![Arc::new(Fixed(result))]);
    SearchExecutor::new(cascade, &PipelineConfig::default())
}

fn found(secondary: Option<&str>) -> LocateResult {
    LocateResult::Found(
        LocatedTarget::new("input[name='q']", LocateMethod::DirectMatch)
            .with_secondary(secondary.map(str::to_string)),
    )
}

#[tokio::test]
async fn test_submit_button_clicked() {
    let doc = MockDocument::new(
        "https://shop.example",
        MockPage::default()
            .with_element("input[name='q']", true)
            .with_element("button[type='submit']", false),
    );
    let outcome = executor(found(Some("button[type='submit']")))
        .run(&doc, "iPhone 15")
        .await;

    assert!(matches!(outcome, SearchOutcome::Clicked { .. }));
    assert_eq!(
        doc.interactions(),
        vec![
            Interaction::Click("input[name='q']".to_string()),
            Interaction::Fill("input[name='q']".to_string(), String::new()),
            Interaction::Fill("input[name='q']".to_string(), "iPhone 15".to_string()),
            Interaction::Click("button[type='submit']".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_button_presses_enter() {
    let doc = MockDocument::new(
        "https://shop.example",
        MockPage::default().with_element("input[name='q']", true),
    );
    let outcome = executor(found(Some("button.go"))).run(&doc, "shoes").await;

    assert_eq!(
        outcome,
        SearchOutcome::KeySubmit {
            input: "input[name='q']".to_string(),
            method: LocateMethod::DirectMatch,
        }
    );
    let interactions = doc.interactions();
    assert_eq!(
        interactions.last(),
        Some(&Interaction::PressEnter("input[name='q']".to_string()))
    );
    assert!(
        !interactions
            .iter()
            .any(|i| matches!(i, Interaction::Click(s) if s == "button.go"))
    );
}

#[tokio::test]
async fn test_failing_button_falls_back_to_enter() {
    let doc = MockDocument::new(
        "https://shop.example",
        MockPage::default()
            .with_element("input[name='q']", true)
            .with_element("#go", true),
    )
    .with_failing_click("#go");
    let outcome = executor(found(Some("#go"))).run(&doc, "shoes").await;
    assert!(matches!(outcome, SearchOutcome::KeySubmit { .. }));
}

#[tokio::test]
async fn test_no_secondary_presses_enter() {
    let doc = MockDocument::new(
        "https://shop.example",
        MockPage::default().with_element("input[name='q']", true),
    );
    assert!(executor(found(None)).execute(&doc, "shoes").await);
    let enters = doc
        .interactions()
        .into_iter()
        .filter(|i| matches!(i, Interaction::PressEnter(_)))
        .count();
    assert_eq!(enters, 1);
}

#[tokio::test]
async fn test_not_located_leaves_document_untouched() {
    let doc = MockDocument::new("https://shop.example", MockPage::default());
    let executor = executor(LocateResult::NotFound);
    assert!(!executor.execute(&doc, "shoes").await);
    assert!(doc.interactions().is_empty());
}

#[tokio::test]
async fn test_vanished_input_is_failure() {
    let doc = MockDocument::new(
        "https://shop.example",
        MockPage::default().with_element("input[name='q']", false),
    );
    let outcome = executor(found(None)).run(&doc, "shoes").await;
    assert!(matches!(outcome, SearchOutcome::Failed { .. }));
    assert!(!outcome.is_executed());
}

//! Direct candidate strategy: try known selectors with a short visibility wait.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use pathfinder_config::LocatorConfig;
use pathfinder_protocols::{
    DocumentError, DocumentPort, LocateMethod, LocatePurpose, LocateRequest, LocateResult,
    LocatedTarget, StrategyError,
};

use crate::cascade::Strategy;
use crate::catalog::CandidateCatalog;
use crate::profile::SiteProfile;

pub struct DirectCandidateStrategy {
    catalog: CandidateCatalog,
    profiles: Vec<SiteProfile>,
    wait: Duration,
    primed_wait: Duration,
    opener_settle: Duration,
    budget: Duration,
}

impl DirectCandidateStrategy {
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            catalog: CandidateCatalog::default(),
            profiles: SiteProfile::builtin(),
            wait: config.direct_wait(),
            primed_wait: config.primed_wait(),
            opener_settle: config.opener_settle(),
            budget: config.direct_budget(),
        }
    }

    pub fn with_catalog(mut self, catalog: CandidateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_profiles(mut self, profiles: Vec<SiteProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Reveal the site's search field, then try the profile's own inputs.
    async fn try_profile(
        &self,
        doc: &dyn DocumentPort,
        profile: &SiteProfile,
    ) -> Result<Option<LocatedTarget>, DocumentError> {
        debug!("Priming search for {}", profile.domain);
        for opener in &profile.openers {
            if self.click_if_visible(doc, opener).await {
                tokio::time::sleep(self.opener_settle).await;
                break;
            }
        }

        for selector in &profile.inputs {
            if doc.wait_for(selector, self.primed_wait, true).await?.is_some() {
                let submit = match self.first_present(doc, &profile.submits).await? {
                    Some(submit) => Some(submit),
                    None => self.find_submit(doc, selector).await?,
                };
                return Ok(Some(
                    LocatedTarget::new(selector.clone(), LocateMethod::DirectMatch)
                        .with_secondary(submit),
                ));
            }
        }
        Ok(None)
    }

    /// Opener failures are never fatal.
    async fn click_if_visible(&self, doc: &dyn DocumentPort, selector: &str) -> bool {
        let handle = match doc.query(selector).await {
            Ok(Some(handle)) => handle,
            Ok(None) => return false,
            Err(e) => {
                debug!("Opener {} unavailable: {}", selector, e);
                return false;
            }
        };
        if !doc.is_visible(&handle).await.unwrap_or(false) {
            return false;
        }
        match doc.click(&handle).await {
            Ok(()) => {
                debug!("Clicked search opener {}", selector);
                true
            }
            Err(e) => {
                debug!("Opener {} click failed: {}", selector, e);
                false
            }
        }
    }

    /// First submit control present for `input`; visibility not required.
    async fn find_submit(
        &self,
        doc: &dyn DocumentPort,
        input: &str,
    ) -> Result<Option<String>, DocumentError> {
        self.first_present(doc, &self.catalog.submits_for(input)).await
    }

    async fn first_present(
        &self,
        doc: &dyn DocumentPort,
        selectors: &[String],
    ) -> Result<Option<String>, DocumentError> {
        for selector in selectors {
            if doc.query(selector).await?.is_some() {
                return Ok(Some(selector.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl Strategy for DirectCandidateStrategy {
    fn name(&self) -> &str {
        "direct"
    }

    fn method(&self) -> LocateMethod {
        LocateMethod::DirectMatch
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn attempt(
        &self,
        doc: &dyn DocumentPort,
        request: &LocateRequest,
    ) -> Result<LocateResult, StrategyError> {
        if request.purpose == LocatePurpose::SearchInput {
            let uri = doc.current_uri().await?;
            if let Some(profile) = self.profiles.iter().find(|p| p.matches(&uri)) {
                if let Some(target) = self.try_profile(doc, profile).await? {
                    return Ok(LocateResult::Found(target));
                }
            }
        }

        for selector in self.catalog.candidates(request.purpose) {
            if doc.wait_for(selector, self.wait, true).await?.is_none() {
                debug!("Candidate {} not visible", selector);
                continue;
            }
            let secondary = match request.purpose {
                LocatePurpose::SearchInput => self.find_submit(doc, selector).await?,
                _ => None,
            };
            return Ok(LocateResult::Found(
                LocatedTarget::new(selector.clone(), self.method()).with_secondary(secondary),
            ));
        }

        Ok(LocateResult::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_protocols::testing::{Interaction, MockDocument, MockPage};

    fn strategy() -> DirectCandidateStrategy {
        let config = LocatorConfig {
            direct_wait_ms: 10,
            primed_wait_ms: 10,
            opener_settle_ms: 1,
            ..Default::default()
        };
        DirectCandidateStrategy::new(&config)
    }

    #[tokio::test]
    async fn test_first_visible_candidate_wins() {
        let doc = MockDocument::new(
            "https://shop.example",
            MockPage::default()
                .with_element("input[type='search']", false)
                .with_element("input[name='q']", true)
                .with_element("#search", true)
                .with_element("button[type='submit']", false),
        );
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let result = strategy().attempt(&doc, &request).await.unwrap();
        let target = result.into_target().unwrap();
        assert_eq!(target.target, "input[name='q']");
        assert_eq!(target.secondary.as_deref(), Some("button[type='submit']"));
        assert_eq!(target.method, LocateMethod::DirectMatch);
    }

    #[tokio::test]
    async fn test_form_scoped_submit_fallback() {
        let doc = MockDocument::new(
            "https://shop.example",
            MockPage::default()
                .with_element("#searchbox", true)
                .with_element("form:has(#searchbox) button", true),
        );
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let target = strategy()
            .attempt(&doc, &request)
            .await
            .unwrap()
            .into_target()
            .unwrap();
        assert_eq!(target.target, "#searchbox");
        assert_eq!(
            target.secondary.as_deref(),
            Some("form:has(#searchbox) button")
        );
    }

    #[tokio::test]
    async fn test_hidden_only_is_not_found() {
        let doc = MockDocument::new(
            "https://shop.example",
            MockPage::default().with_element("input[name='q']", false),
        );
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let result = strategy().attempt(&doc, &request).await.unwrap();
        assert!(!result.is_found());
    }

    #[tokio::test]
    async fn test_apple_priming_clicks_opener() {
        let doc = MockDocument::new(
            "https://www.apple.com/",
            MockPage::default()
                .with_element("#ac-gn-searchform", false)
                .with_element("a[aria-label*='Search' i]", true)
                .with_element("#ac-gn-searchform-input", false)
                .with_element("button[type='submit']", false)
                .with_reveal("a[aria-label*='Search' i]", &["#ac-gn-searchform-input"]),
        );
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let target = strategy()
            .attempt(&doc, &request)
            .await
            .unwrap()
            .into_target()
            .unwrap();
        assert_eq!(target.target, "#ac-gn-searchform-input");
        assert_eq!(
            target.secondary.as_deref(),
            Some("button[type='submit']")
        );
        assert_eq!(
            doc.interactions(),
            vec![Interaction::Click("a[aria-label*='Search' i]".to_string())]
        );
    }

    #[tokio::test]
    async fn test_apple_priming_without_submit_control() {
        let doc = MockDocument::new(
            "https://www.apple.com/",
            MockPage::default().with_element("#ac-gn-searchform-input", true),
        );
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let target = strategy()
            .attempt(&doc, &request)
            .await
            .unwrap()
            .into_target()
            .unwrap();
        assert_eq!(target.target, "#ac-gn-searchform-input");
        assert!(target.secondary.is_none());
    }

    #[tokio::test]
    async fn test_priming_failure_falls_through_to_catalog() {
        let doc = MockDocument::new(
            "https://www.apple.com/",
            MockPage::default()
                .with_element("#ac-gn-searchform", true)
                .with_element("input[name='search']", true),
        )
        .with_failing_click("#ac-gn-searchform");
        let request = LocateRequest::new(LocatePurpose::SearchInput);
        let target = strategy()
            .attempt(&doc, &request)
            .await
            .unwrap()
            .into_target()
            .unwrap();
        assert_eq!(target.target, "input[name='search']");
    }

    #[tokio::test]
    async fn test_submit_purpose_requires_visibility() {
        let doc = MockDocument::new(
            "https://shop.example",
            MockPage::default()
                .with_element("button[type='submit']", false)
                .with_element("input[type='submit']", true),
        );
        let request = LocateRequest::new(LocatePurpose::SearchSubmit);
        let target = strategy()
            .attempt(&doc, &request)
            .await
            .unwrap()
            .into_target()
            .unwrap();
        assert_eq!(target.target, "input[type='submit']");
        assert!(target.secondary.is_none());
    }
}

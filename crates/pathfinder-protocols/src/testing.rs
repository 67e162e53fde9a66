//! In-memory test doubles for [`DocumentPort`] and [`InferenceClient`].
//!
//! `MockDocument` is not a CSS engine: an element "matches" a selector only
//! when it was registered under exactly that selector string.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::document::{DocumentPort, ElementHandle};
use crate::error::{DocumentError, InferenceError};
use crate::inference::{InferenceClient, InferenceRequest};

/// A recorded document interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Navigate(String),
    Click(String),
    Fill(String, String),
    PressEnter(String),
}

/// Markup plus registered elements for one URI.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    markup: String,
    elements: HashMap<String, bool>,
    reveals: HashMap<String, Vec<String>>,
}

impl MockPage {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Default::default()
        }
    }

    /// Register an element under `selector`.
    pub fn with_element(mut self, selector: impl Into<String>, visible: bool) -> Self {
        self.elements.insert(selector.into(), visible);
        self
    }

    /// Clicking `opener` makes each of `revealed` visible.
    pub fn with_reveal(mut self, opener: impl Into<String>, revealed: &[&str]) -> Self {
        self.reveals.insert(
            opener.into(),
            revealed.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    uri: String,
    page: MockPage,
    pages: HashMap<String, MockPage>,
    failing_navigations: HashSet<String>,
    unavailable: bool,
    failing_clicks: HashSet<String>,
    interactions: Vec<Interaction>,
    waits: Vec<String>,
}

/// An in-memory document.
#[derive(Debug, Default)]
pub struct MockDocument {
    state: Mutex<MockState>,
}

impl MockDocument {
    pub fn new(uri: impl Into<String>, page: MockPage) -> Self {
        Self {
            state: Mutex::new(MockState {
                uri: uri.into(),
                page,
                ..Default::default()
            }),
        }
    }

    /// A blank document that only serves pages reached by navigation.
    pub fn blank() -> Self {
        Self::new("about:blank", MockPage::default())
    }

    /// Serve `page` when `uri` is navigated to.
    pub fn with_page(self, uri: impl Into<String>, page: MockPage) -> Self {
        self.lock().pages.insert(uri.into(), page);
        self
    }

    pub fn with_failing_navigation(self, uri: impl Into<String>) -> Self {
        self.lock().failing_navigations.insert(uri.into());
        self
    }

    pub fn with_failing_click(self, selector: impl Into<String>) -> Self {
        self.lock().failing_clicks.insert(selector.into());
        self
    }

    /// Every operation after the next navigation reports a transport failure.
    pub fn with_unavailable_surface(self) -> Self {
        self.lock().unavailable = true;
        self
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.lock().interactions.clone()
    }

    /// Selectors passed to `wait_for`, in call order.
    pub fn waits(&self) -> Vec<String> {
        self.lock().waits.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock document state poisoned")
    }

    fn check_available(state: &MockState) -> Result<(), DocumentError> {
        if state.unavailable && !state.interactions.is_empty() {
            return Err(DocumentError::Unavailable("page closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentPort for MockDocument {
    async fn current_uri(&self) -> Result<String, DocumentError> {
        let state = self.lock();
        Self::check_available(&state)?;
        Ok(state.uri.clone())
    }

    async fn navigate(&self, uri: &str) -> Result<(), DocumentError> {
        let mut state = self.lock();
        state.interactions.push(Interaction::Navigate(uri.to_string()));
        if state.failing_navigations.contains(uri) {
            return Err(DocumentError::NavigationFailed(uri.to_string()));
        }
        state.page = state.pages.get(uri).cloned().unwrap_or_default();
        state.uri = uri.to_string();
        Ok(())
    }

    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, DocumentError> {
        let state = self.lock();
        Self::check_available(&state)?;
        Ok(state
            .page
            .elements
            .contains_key(selector)
            .then(|| ElementHandle::new(selector)))
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DocumentError> {
        let state = self.lock();
        Self::check_available(&state)?;
        Ok(state
            .page
            .elements
            .get(handle.selector())
            .copied()
            .unwrap_or(false))
    }

    async fn wait_for(
        &self,
        selector: &str,
        _timeout: Duration,
        visible: bool,
    ) -> Result<Option<ElementHandle>, DocumentError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        state.waits.push(selector.to_string());
        let ready = match state.page.elements.get(selector) {
            Some(is_visible) => *is_visible || !visible,
            None => false,
        };
        Ok(ready.then(|| ElementHandle::new(selector)))
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DocumentError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        let selector = handle.selector().to_string();
        if state.failing_clicks.contains(&selector) {
            return Err(DocumentError::InteractionFailed(format!(
                "element {} is detached",
                selector
            )));
        }
        if let Some(revealed) = state.page.reveals.get(&selector).cloned() {
            for target in revealed {
                state.page.elements.insert(target, true);
            }
        }
        state.interactions.push(Interaction::Click(selector));
        Ok(())
    }

    async fn fill(&self, handle: &ElementHandle, text: &str) -> Result<(), DocumentError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        state.interactions.push(Interaction::Fill(
            handle.selector().to_string(),
            text.to_string(),
        ));
        Ok(())
    }

    async fn press_enter(&self, handle: &ElementHandle) -> Result<(), DocumentError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        state
            .interactions
            .push(Interaction::PressEnter(handle.selector().to_string()));
        Ok(())
    }

    async fn raw_markup(&self) -> Result<String, DocumentError> {
        let state = self.lock();
        Self::check_available(&state)?;
        Ok(state.page.markup.clone())
    }
}

/// A scripted reply from [`MockInference`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    RateLimited,
    NetworkError,
}

impl MockReply {
    fn into_result(self) -> Result<String, InferenceError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::RateLimited => Err(InferenceError::RateLimited(
                "You exceeded your current quota".to_string(),
            )),
            MockReply::NetworkError => {
                Err(InferenceError::Network("connection refused".to_string()))
            }
        }
    }
}

/// An inference client that replays scripted replies in order. When the
/// script runs out the fallback reply is used for every further call.
#[derive(Debug)]
pub struct MockInference {
    script: Mutex<Vec<MockReply>>,
    fallback: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockInference {
    pub fn new(fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            fallback,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with a quota error.
    pub fn quota_exhausted() -> Self {
        Self::new(MockReply::RateLimited)
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Queue `reply` ahead of the fallback.
    pub fn then(self, reply: MockReply) -> Self {
        self.script
            .lock()
            .expect("mock inference script poisoned")
            .push(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("mock inference prompts poisoned")
            .clone()
    }
}

#[async_trait]
impl InferenceClient for MockInference {
    fn id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: InferenceRequest) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("mock inference prompts poisoned")
            .push(request.user_prompt);
        let next = {
            let mut script = self.script.lock().expect("mock inference script poisoned");
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };
        next.unwrap_or_else(|| self.fallback.clone()).into_result()
    }
}

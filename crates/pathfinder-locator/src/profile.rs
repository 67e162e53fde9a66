//! Site priming profiles.
//!
//! Some sites hide their search field behind a toggle. A profile names the
//! toggles to click and the selectors to try once the field is revealed.

#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Substring of the document URI this profile applies to.
    pub domain: String,
    /// Controls that reveal the search field; the first visible one is clicked.
    pub openers: Vec<String>,
    pub inputs: Vec<String>,
    /// Submit controls to look for, in order.
    pub submits: Vec<String>,
}

impl SiteProfile {
    pub fn matches(&self, uri: &str) -> bool {
        uri.contains(&self.domain)
    }

    pub fn apple() -> Self {
        Self {
            domain: "apple.com".to_string(),
            openers: [
                "#ac-gn-searchform",
                "button.ac-gn-searchform-submit",
                "a[aria-label*='Search' i]",
                "button[aria-label*='Search' i]",
                ".ac-gn-searchform",
                "#globalnav-menustate-search",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            inputs: [
                "#ac-gn-searchform-input",
                "input.ac-gn-searchform-input",
                "input[type='search']",
                "input[name='q']",
                "input[aria-label*='Search' i]",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            submits: ["button.ac-gn-searchform-submit", "button[type='submit']"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Profiles shipped with the locator.
    pub fn builtin() -> Vec<Self> {
        vec![Self::apple()]
    }
}

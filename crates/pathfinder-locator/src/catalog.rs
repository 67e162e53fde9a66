//! Ordered selector candidates for the direct strategy.

use pathfinder_protocols::LocatePurpose;

const SEARCH_INPUTS: &[&str] = &[
    "input[type='search']",
    "input[type='text'][name*='search' i]",
    "input[type='text'][id*='search' i]",
    "input[type='text'][placeholder*='Search' i]",
    "input[type='text'][placeholder*='search' i]",
    "input[name='q']",
    "input[name='search']",
    "input[id='search']",
    "input[id='searchbox']",
    "#search",
    "#searchbox",
    ".search input",
    ".searchbox input",
    "input[aria-label*='Search' i]",
    "input[aria-label*='search' i]",
    "form[action*='search' i] input",
    "form[method='get'] input[type='text']",
];

const SEARCH_SUBMITS: &[&str] = &[
    "button[type='submit']",
    "input[type='submit']",
    "button.search",
    "button[aria-label*='Search' i]",
    "form button",
];

const LISTING_ITEMS: &[&str] = &[
    "[data-product-id] a[href]",
    ".product a[href]",
    ".product-item a[href]",
    ".product-card a[href]",
    "a[href*='/product']",
    "a[href*='/item']",
];

/// Per-purpose candidate selectors, tried in order.
#[derive(Debug, Clone)]
pub struct CandidateCatalog {
    inputs: Vec<String>,
    submits: Vec<String>,
    listings: Vec<String>,
}

impl Default for CandidateCatalog {
    fn default() -> Self {
        Self {
            inputs: to_owned(SEARCH_INPUTS),
            submits: to_owned(SEARCH_SUBMITS),
            listings: to_owned(LISTING_ITEMS),
        }
    }
}

impl CandidateCatalog {
    pub fn new(inputs: Vec<String>, submits: Vec<String>, listings: Vec<String>) -> Self {
        Self {
            inputs,
            submits,
            listings,
        }
    }

    pub fn candidates(&self, purpose: LocatePurpose) -> &[String] {
        match purpose {
            LocatePurpose::SearchInput => &self.inputs,
            LocatePurpose::SearchSubmit => &self.submits,
            LocatePurpose::ListingItem => &self.listings,
        }
    }

    /// Submit candidates for a located search input, ending with a button
    /// inside the input's own form.
    pub fn submits_for(&self, input: &str) -> Vec<String> {
        let mut submits = self.submits.clone();
        submits.push(format!("form:has({}) button", input));
        submits
    }
}

fn to_owned(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

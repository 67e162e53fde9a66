//! Target site selection.

use tracing::debug;

use pathfinder_config::SiteEntry;
use pathfinder_protocols::Intent;

const BUILTIN_SITES: &[(&str, &str)] = &[
    ("apple", "https://www.apple.com"),
    ("samsung", "https://www.samsung.com"),
    ("google", "https://store.google.com"),
    ("sony", "https://www.sony.com"),
    ("lg", "https://www.lg.com"),
    ("nike", "https://www.nike.com"),
    ("adidas", "https://www.adidas.com"),
];

/// Product keywords that imply a site when no brand matched.
const KEYWORD_SITES: &[(&str, &str)] = &[
    ("iphone", "https://www.apple.com"),
    ("ipad", "https://www.apple.com"),
    ("mac", "https://www.apple.com"),
    ("apple", "https://www.apple.com"),
];

/// Resolves the site to search for an [`Intent`].
#[derive(Debug, Clone)]
pub struct SiteSelector {
    sites: Vec<(String, String)>,
}

impl Default for SiteSelector {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SiteSelector {
    /// Configured rows are consulted before the built-in table.
    pub fn new(extra: &[SiteEntry]) -> Self {
        let sites = extra
            .iter()
            .filter(|entry| !entry.brand.trim().is_empty())
            .map(|entry| (entry.brand.trim().to_lowercase(), entry.url.clone()))
            .chain(
                BUILTIN_SITES
                    .iter()
                    .map(|(brand, url)| (brand.to_string(), url.to_string())),
            )
            .collect();
        Self { sites }
    }

    /// Explicit site, then brand table, then product keywords.
    pub fn select(&self, intent: &Intent) -> Option<String> {
        if let Some(site) = intent.target_site.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(site.to_string());
        }

        let brand = intent.qualifier.as_deref().unwrap_or_default().to_lowercase();
        let subject = intent.subject.to_lowercase();

        if let Some((key, url)) = self
            .sites
            .iter()
            .find(|(key, _)| brand.contains(key.as_str()) || subject.contains(key.as_str()))
        {
            debug!("Site {} chosen for brand key '{}'", url, key);
            return Some(url.clone());
        }

        KEYWORD_SITES
            .iter()
            .find(|(keyword, _)| subject.contains(keyword))
            .map(|(keyword, url)| {
                debug!("Site {} inferred from keyword '{}'", url, keyword);
                url.to_string()
            })
    }
}

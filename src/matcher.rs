//! Which inbound requests are routed through the gate.
//!
//! Static build assets and the favicon never carry a decision; the host
//! serves them directly. Everything else goes through the gate.

use serde::{Deserialize, Serialize};

fn default_exclude_prefixes() -> Vec<String> {
    ["/_next/static", "/_next/image", "/favicon.ico"].into_iter().map(String::from).collect()
}

/// Paths excluded from gate evaluation.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::MatcherConfig;
///
/// let config = MatcherConfig::builder()
///     .exclude_prefixes(vec!["/assets".to_string()])
///     .build();
/// assert_eq!(config.exclude_prefixes, vec!["/assets".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct MatcherConfig {
    /// Path prefixes the gate never sees.
    #[builder(default = default_exclude_prefixes())]
    pub exclude_prefixes: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Decides whether a request path is in the gate's scope.
///
/// ```rust
/// use storefront_gate::RouteMatcher;
///
/// let matcher = RouteMatcher::default();
/// assert!(matcher.matches("/dashboard"));
/// assert!(!matcher.matches("/_next/static/chunks/main.js"));
/// assert!(!matcher.matches("/favicon.ico"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    exclude: Vec<String>,
}

impl RouteMatcher {
    /// Creates a matcher from its configuration.
    pub fn new(config: &MatcherConfig) -> Self {
        Self { exclude: config.exclude_prefixes.clone() }
    }

    /// Returns `true` if the path must be evaluated by the gate.
    ///
    /// Matching is on the raw path so an excluded asset is never normalized
    /// into a protected route. A path with dot segments is always in scope.
    pub fn matches(&self, path: &str) -> bool {
        if has_dot_segment(path) {
            return true;
        }
        !self.exclude.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// The excluded prefixes.
    pub fn exclude_prefixes(&self) -> &[String] {
        &self.exclude
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl From<&MatcherConfig> for RouteMatcher {
    fn from(config: &MatcherConfig) -> Self {
        Self::new(config)
    }
}

fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let segment = segment.to_ascii_lowercase();
        (segment.starts_with('.') && segment.trim_start_matches('.').is_empty())
            || segment.contains("%2e")
    })
}

use std::fmt;
use url::Url;

/// Host pattern describing which hosts belong to a crawl
///
/// Two shapes are supported:
/// 1. Exact: `example.com` matches only `example.com`
/// 2. Subdomains: `*.example.com` matches:
///    - `example.com` (the bare host)
///    - `blog.example.com` (single subdomain)
///    - `api.v2.example.com` (nested subdomains)
///
/// # Examples
///
/// ```
/// use site_scribe::url::HostPattern;
///
/// let exact = HostPattern::exact("example.com");
/// assert!(exact.matches("example.com"));
/// assert!(!exact.matches("blog.example.com"));
///
/// let wide = HostPattern::with_subdomains("example.com");
/// assert!(wide.matches("example.com"));
/// assert!(wide.matches("api.v2.example.com"));
/// assert!(!wide.matches("notexample.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    Exact(String),
    WithSubdomains(String),
}

impl HostPattern {
    pub fn exact(host: &str) -> Self {
        Self::Exact(host.to_lowercase())
    }

    pub fn with_subdomains(host: &str) -> Self {
        Self::WithSubdomains(host.to_lowercase())
    }

    /// Checks a host against the pattern (case-insensitive)
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        match self {
            Self::Exact(host) => candidate == *host,
            Self::WithSubdomains(base) => {
                candidate == *base
                    || candidate
                        .strip_suffix(base.as_str())
                        .map_or(false, |prefix| prefix.ends_with('.'))
            }
        }
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(host) => write!(f, "{}", host),
            Self::WithSubdomains(base) => write!(f, "*.{}", base),
        }
    }
}

/// Extracts the lowercase host of a URL
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

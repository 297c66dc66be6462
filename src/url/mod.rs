//! URL handling module for Site-Scribe
//!
//! This module provides URL normalization, host matching, and the same-domain
//! scope test that decides which discovered links may enter the frontier.

mod matcher;
mod normalize;

// Re-export main functions
pub use matcher::{extract_host, HostPattern};
pub use normalize::{non_text_extension, normalize_url, resolve_href};

use crate::{UrlError, UrlResult};
use url::Url;

/// The set of URLs a crawl is allowed to visit
///
/// A URL is in scope when its host matches the seed's host pattern and it
/// carries the same explicit port as the seed. Default ports are not explicit,
/// so `http://example.com` and `https://example.com` share a scope while
/// `http://example.com:8080` does not.
#[derive(Debug, Clone)]
pub struct UrlScope {
    pattern: HostPattern,
    port: Option<u16>,
}

impl UrlScope {
    /// Builds the scope for a seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized start URL
    /// * `include_subdomains` - Whether `*.seed-host` is also in scope
    pub fn from_seed(seed: &Url, include_subdomains: bool) -> UrlResult<Self> {
        let host = extract_host(seed).ok_or(UrlError::MissingHost)?;
        let pattern = if include_subdomains {
            HostPattern::with_subdomains(&host)
        } else {
            HostPattern::exact(&host)
        };

        Ok(Self {
            pattern,
            port: seed.port(),
        })
    }

    /// The host pattern of this scope
    pub fn pattern(&self) -> &HostPattern {
        &self.pattern
    }

    /// Returns true if the URL's host and port belong to this scope
    pub fn contains(&self, url: &Url) -> bool {
        url.port() == self.port && extract_host(url).map_or(false, |h| self.pattern.matches(&h))
    }

    /// Checks an already-normalized URL against the scope and the
    /// non-text extension denylist
    pub fn check(&self, url: &Url) -> UrlResult<()> {
        if !self.contains(url) {
            let authority = match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => return Err(UrlError::MissingHost),
            };
            return Err(UrlError::OutOfScope(authority));
        }

        if let Some(extension) = non_text_extension(url) {
            return Err(UrlError::NonTextResource(extension));
        }

        Ok(())
    }

    /// Resolves and normalizes `href` against `base`, then checks scope
    ///
    /// Returns the reason on rejection.
    pub fn resolve(&self, base: &Url, href: &str) -> UrlResult<Url> {
        let url = resolve_href(base, href)?;
        self.check(&url)?;
        Ok(url)
    }

    /// Resolves, normalizes and scopes a candidate link
    ///
    /// Returns `None` when the link is rejected. Pure: no I/O, and
    /// `normalize(base, normalize(base, href))` equals `normalize(base, href)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_scribe::url::UrlScope;
    /// use url::Url;
    ///
    /// let seed = Url::parse("https://example.com/").unwrap();
    /// let scope = UrlScope::from_seed(&seed, false).unwrap();
    ///
    /// let link = scope.normalize(&seed, "/docs/#install").unwrap();
    /// assert_eq!(link.as_str(), "https://example.com/docs");
    ///
    /// assert!(scope.normalize(&seed, "https://other.org/").is_none());
    /// assert!(scope.normalize(&seed, "/brochure.pdf").is_none());
    /// ```
    pub fn normalize(&self, base: &Url, href: &str) -> Option<Url> {
        match self.resolve(base, href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!("Rejected link {:?} on {}: {}", href, base, e);
                None
            }
        }
    }
}

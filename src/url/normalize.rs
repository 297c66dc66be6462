use crate::{UrlError, UrlResult};
use url::Url;

/// Path extensions that never lead to a text page worth transcribing
const NON_TEXT_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "bmp", "tif", "tiff", "avif",
    // audio / video
    "mp3", "mp4", "m4a", "m4v", "wav", "ogg", "webm", "avi", "mov", "mkv", "flac",
    // archives / binaries
    "zip", "gz", "tgz", "tar", "bz2", "xz", "7z", "rar", "exe", "dmg", "msi", "iso", "apk", "bin",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "epub", "csv",
    // page assets and feeds
    "css", "js", "mjs", "map", "json", "xml", "rss", "atom", "woff", "woff2", "ttf", "otf", "eot",
];

/// Normalizes an absolute URL according to Site-Scribe's canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not http:// or https://
/// 3. Require a host (the `url` crate already lowercases it and drops default ports)
/// 4. Normalize path:
///    - Remove dot segments (. and ..) and repeated slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
///
/// Query strings are kept exactly as written: `?page=1` and `?page=2` are
/// different pages.
///
/// # Examples
///
/// ```
/// use site_scribe::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Resolves `href` against `base` and normalizes the result
///
/// Relative references, protocol-relative references and absolute URLs are all
/// accepted. `javascript:`, `mailto:`, `tel:` and `data:` links resolve to
/// their own scheme and are rejected as [`UrlError::InvalidScheme`].
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    let joined = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    canonicalize(joined)
}

/// Returns the lowercase extension of the last path segment if it names a
/// non-text resource
pub fn non_text_extension(url: &Url) -> Option<String> {
    let last_segment = url.path_segments()?.last()?;
    let (stem, extension) = last_segment.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }

    let extension = extension.to_ascii_lowercase();
    NON_TEXT_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

fn canonicalize(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    // "https://example.com/?" and "https://example.com/" are the same page
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

use crate::config::parser::resolve_output_path;
use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use std::io;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(config)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_start_url(&config.start_url)?;

    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_seconds must be a non-negative number, got {}",
            config.delay_seconds
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.time_limit_seconds == Some(0) {
        return Err(ConfigError::Validation(
            "time_limit_seconds must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start URL: it must parse, use HTTP(S), and name a host
fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    if start_url.trim().is_empty() {
        return Err(ConfigError::InvalidUrl("start URL is required".to_string()));
    }

    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http:// or https://",
            start_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
///
/// Only checks what can be known without creating the file: the path is set,
/// does not name a directory, and its parent directory exists. Permission
/// problems surface when the document is opened, before any request is made.
fn validate_output_config(config: &Config) -> Result<(), ConfigError> {
    if config.output.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    // Checked before resolving: `out` names a directory even though the
    // resolved path would be `out.md`
    let raw = Path::new(&config.output.path);
    if raw.is_dir() {
        return Err(ConfigError::UnwritableOutput {
            path: raw.display().to_string(),
            source: io::Error::new(io::ErrorKind::Other, "path is a directory"),
        });
    }

    let path = resolve_output_path(config);
    if path.is_dir() {
        return Err(ConfigError::UnwritableOutput {
            path: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::Other, "path is a directory"),
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ConfigError::UnwritableOutput {
                path: path.display().to_string(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("directory {} does not exist", parent.display()),
                ),
            });
        }
    }

    Ok(())
}

use crate::config::types::Config;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// Missing sections and fields fall back to their defaults. The result is not
/// validated here because command-line overrides still have to be applied;
/// call [`validate`](crate::config::validate) once the final values are known.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_scribe::config::load_config;
///
/// let config = load_config(Path::new("scribe.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Resolves the final output path for a configuration
///
/// A path without an extension gets the format's extension appended, so
/// `--output notes` with Markdown output writes `notes.md`.
pub fn resolve_output_path(config: &Config) -> PathBuf {
    let path = PathBuf::from(&config.output.path);
    if path.extension().is_none() {
        path.with_extension(config.output.format.extension())
    } else {
        path
    }
}

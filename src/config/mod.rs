//! Configuration module for Site-Scribe
//!
//! This module handles loading, parsing, and validating configuration. Values
//! are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. Validation runs once on the final result.
//!
//! # Example
//!
//! ```no_run
//! use site_scribe::config::{load_config, validate};
//! use std::path::Path;
//!
//! let mut config = load_config(Path::new("scribe.toml")).unwrap();
//! config.crawler.start_url = "https://example.com/".to_string();
//! config.output.path = "example.md".to_string();
//! validate(&config).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DocumentFormat, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config, resolve_output_path};
pub use validation::validate;

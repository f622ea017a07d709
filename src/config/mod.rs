//! Configuration module for Title-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is equivalent to loading
//! an empty one.
//!
//! # Example
//!
//! ```no_run
//! use title_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("title-scout.toml")).unwrap();
//! println!("Listening on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherSettings, ServerConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

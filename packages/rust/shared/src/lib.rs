//! Shared types, error model, and configuration for notepress.
//!
//! This crate is the foundation depended on by all other notepress crates.
//! It provides:
//! - [`NotepressError`], the unified error type
//! - Domain types ([`NotebookPaths`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConverterConfig, FrontMatterDefaults, NotebookConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{NotepressError, Result};
pub use types::{ASSETS_SUFFIX, NOTEBOOK_EXTENSION, NotebookPaths};

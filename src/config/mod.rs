//! Configuration loading and validation
//!
//! A [`CrawlConfig`] is built either programmatically, from command-line
//! flags, or from a TOML file. Validation runs before any crawl starts;
//! invalid configurations are fatal.

mod file;
mod types;
mod validation;

pub use file::load_config;
pub use types::{default_allowed_extensions, CrawlConfig};
pub use validation::validate;

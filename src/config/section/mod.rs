//! Configuration section definitions.

mod cache;
mod converter;
mod paths;
mod serve;

pub use cache::{CacheConfig, TimingConfig};
pub use converter::ConverterConfig;
pub use paths::PathsConfig;
pub use serve::ServeConfig;

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{photo::HttpPhotoResolver, storage::LocalStorage};
pub use app::pipelines::FixPipeline;
pub use config::toml_config::TomlConfig;
pub use core::{engine::FixEngine, registry::ServiceRegistry};
pub use utils::error::{NormalizerError, Result};

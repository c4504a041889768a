pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    etl::DirectoryEngine,
    formatter::{FormatStep, FormatterPipeline},
    pipeline::DirectoryPipeline,
};
pub use domain::model::{Contact, ContactRow, DirectoryStats};
pub use utils::error::{DirectoryError, Result};

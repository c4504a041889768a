pub mod dedup;
pub mod etl;
pub mod formatter;
pub mod loader;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Contact, ContactRow, DirectoryStats, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

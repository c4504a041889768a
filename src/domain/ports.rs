use crate::core::formatter::FormatStep;
use crate::domain::model::{Contact, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> char;
    fn has_header(&self) -> bool;
    fn format_steps(&self) -> &[FormatStep];
    fn title(&self) -> &str;
    fn stats_json_path(&self) -> Option<&str>;
    fn export_csv_path(&self) -> Option<&str>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<Contact>>;
    fn transform(&self, data: Vec<Contact>) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}

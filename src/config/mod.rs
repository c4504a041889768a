pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

/// Extensions accepted for contact sources.
pub const INPUT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

pub const DEFAULT_OUTPUT: &str = "contacts_directory.html";

#[cfg(feature = "cli")]
mod cli_config {
    use super::{DEFAULT_OUTPUT, INPUT_EXTENSIONS};
    use crate::core::formatter::FormatStep;
    use crate::core::report::DEFAULT_TITLE;
    use crate::core::ConfigProvider;
    use crate::utils::error::{DirectoryError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "contact-directory")]
    #[command(about = "Merge contact CSV exports into one de-duplicated HTML directory")]
    pub struct CliConfig {
        /// Contact CSV files, loaded in order
        pub inputs: Vec<String>,

        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        pub output: String,

        #[arg(long, default_value_t = ',')]
        pub delimiter: char,

        #[arg(long, help = "Input files have no header line")]
        pub no_header: bool,

        #[arg(long, default_value = DEFAULT_TITLE)]
        pub title: String,

        #[arg(long, value_delimiter = ',', default_values_t = FormatStep::DEFAULT_ORDER)]
        pub steps: Vec<FormatStep>,

        #[arg(long, help = "Also write the statistics as JSON to this path")]
        pub stats_json: Option<String>,

        #[arg(long, help = "Also export the unique contacts as CSV to this path")]
        pub export_csv: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per stage")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_files(&self) -> &[String] {
            &self.inputs
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn delimiter(&self) -> char {
            self.delimiter
        }

        fn has_header(&self) -> bool {
            !self.no_header
        }

        fn format_steps(&self) -> &[FormatStep] {
            &self.steps
        }

        fn title(&self) -> &str {
            &self.title
        }

        fn stats_json_path(&self) -> Option<&str> {
            self.stats_json.as_deref()
        }

        fn export_csv_path(&self) -> Option<&str> {
            self.export_csv.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_file_extensions("inputs", &self.inputs, &INPUT_EXTENSIONS)?;
            validation::validate_path("output", &self.output)?;
            validation::validate_delimiter("delimiter", self.delimiter)?;
            validation::validate_non_empty_string("title", &self.title)?;

            if self.steps.is_empty() {
                return Err(DirectoryError::ConfigValidationError {
                    field: "steps".to_string(),
                    message: "At least one format step is required".to_string(),
                });
            }

            for (field, path) in [
                ("stats_json", &self.stats_json),
                ("export_csv", &self.export_csv),
            ] {
                if let Some(path) = path {
                    validation::validate_path(field, path)?;
                }
            }

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["contact-directory", "hr.csv", "it.csv"]);

            assert_eq!(config.input_files(), ["hr.csv", "it.csv"]);
            assert_eq!(config.output_path(), DEFAULT_OUTPUT);
            assert_eq!(config.delimiter(), ',');
            assert!(config.has_header());
            assert_eq!(config.format_steps(), FormatStep::DEFAULT_ORDER);
            assert_eq!(config.title(), DEFAULT_TITLE);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_custom_arguments() {
            let config = CliConfig::parse_from([
                "contact-directory",
                "--delimiter",
                ";",
                "--no-header",
                "--steps",
                "normalize,email-link",
                "-o",
                "out/dir.html",
                "--stats-json",
                "out/stats.json",
                "contacts.txt",
            ]);

            assert_eq!(config.delimiter(), ';');
            assert!(!config.has_header());
            assert_eq!(
                config.format_steps(),
                [FormatStep::Normalize, FormatStep::EmailLink]
            );
            assert_eq!(config.output_path(), "out/dir.html");
            assert_eq!(config.stats_json_path(), Some("out/stats.json"));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_unknown_step_is_rejected_by_parser() {
            let result = CliConfig::try_parse_from(["contact-directory", "--steps", "shout"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_validation_rejects_bad_inputs() {
            let config = CliConfig::parse_from(["contact-directory", "contacts.xlsx"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["contact-directory", "--title", "  "]);
            assert!(config.validate().is_err());
        }
    }
}

use super::INPUT_EXTENSIONS;
use crate::core::formatter::FormatStep;
use crate::core::report::DEFAULT_TITLE;
use crate::core::ConfigProvider;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub directory: DirectorySection,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub format: FormatConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySection {
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for DirectorySection {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_true")]
    pub has_header: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            delimiter: default_delimiter(),
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_steps")]
    pub steps: Vec<FormatStep>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub html: Option<String>,
    pub stats_json: Option<String>,
    pub export_csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

fn default_steps() -> Vec<FormatStep> {
    FormatStep::DEFAULT_ORDER.to_vec()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DirectoryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DirectoryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONTACTS_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("directory.title", &self.directory.title)?;
        validation::validate_file_extensions("source.files", &self.source.files, &INPUT_EXTENSIONS)?;
        validation::validate_delimiter("source.delimiter", self.source.delimiter)?;

        let html = validation::validate_required_field("output.html", &self.output.html)?;
        validation::validate_path("output.html", html)?;

        if let Some(path) = &self.output.stats_json {
            validation::validate_path("output.stats_json", path)?;
        }
        if let Some(path) = &self.output.export_csv {
            validation::validate_path("output.export_csv", path)?;
        }

        if self.format.steps.is_empty() {
            return Err(DirectoryError::ConfigValidationError {
                field: "format.steps".to_string(),
                message: "At least one format step is required".to_string(),
            });
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_files(&self) -> &[String] {
        &self.source.files
    }

    fn output_path(&self) -> &str {
        // validate_config 已確認存在
        self.output.html.as_deref().unwrap_or(super::DEFAULT_OUTPUT)
    }

    fn delimiter(&self) -> char {
        self.source.delimiter
    }

    fn has_header(&self) -> bool {
        self.source.has_header
    }

    fn format_steps(&self) -> &[FormatStep] {
        &self.format.steps
    }

    fn title(&self) -> &str {
        &self.directory.title
    }

    fn stats_json_path(&self) -> Option<&str> {
        self.output.stats_json.as_deref()
    }

    fn export_csv_path(&self) -> Option<&str> {
        self.output.export_csv.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[directory]
title = "Sales Contacts"

[source]
files = ["data/contacts_hr.csv", "data/contacts_it.csv"]
delimiter = ";"
has_header = false

[format]
steps = ["normalize", "strong-surname"]

[output]
html = "out/directory.html"
stats_json = "out/stats.json"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.title(), "Sales Contacts");
        assert_eq!(config.input_files().len(), 2);
        assert_eq!(config.delimiter(), ';');
        assert!(!config.has_header());
        assert_eq!(
            config.format_steps(),
            [FormatStep::Normalize, FormatStep::StrongSurname]
        );
        assert_eq!(config.output_path(), "out/directory.html");
        assert_eq!(config.stats_json_path(), Some("out/stats.json"));
        assert_eq!(config.export_csv_path(), None);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let toml_content = r#"
[output]
html = "directory.html"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.title(), DEFAULT_TITLE);
        assert!(config.input_files().is_empty());
        assert_eq!(config.delimiter(), ',');
        assert!(config.has_header());
        assert_eq!(config.format_steps(), FormatStep::DEFAULT_ORDER);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTACT_DIRECTORY_TEST_DIR", "/srv/contacts");

        let toml_content = r#"
[source]
files = ["${CONTACT_DIRECTORY_TEST_DIR}/hr.csv", "${CONTACT_DIRECTORY_UNSET_VAR}/it.csv"]

[output]
html = "out.html"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.files[0], "/srv/contacts/hr.csv");
        assert_eq!(config.source.files[1], "${CONTACT_DIRECTORY_UNSET_VAR}/it.csv");

        std::env::remove_var("CONTACT_DIRECTORY_TEST_DIR");
    }

    #[test]
    fn test_missing_html_output_fails_validation() {
        let toml_content = r#"
[output]
stats_json = "stats.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DirectoryError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_step_fails_parsing() {
        let toml_content = r#"
[format]
steps = ["normalize", "shout"]

[output]
html = "out.html"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[directory]
title = "File Test"

[output]
html = "out.html"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.title(), "File Test");
    }
}

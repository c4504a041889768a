use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Invalid contact: {reason}")]
    InvalidContact { reason: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DirectoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DirectoryError::IoError(_) | DirectoryError::SourceNotFound { .. } => ErrorCategory::Io,
            DirectoryError::CsvError(_)
            | DirectoryError::SerializationError(_)
            | DirectoryError::InvalidContact { .. } => ErrorCategory::Data,
            DirectoryError::ConfigValidationError { .. }
            | DirectoryError::InvalidConfigValueError { .. }
            | DirectoryError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆資料錯誤只會略過該筆
            DirectoryError::InvalidContact { .. } => ErrorSeverity::Low,
            DirectoryError::SourceNotFound { .. } | DirectoryError::CsvError(_) => {
                ErrorSeverity::Medium
            }
            DirectoryError::ConfigValidationError { .. }
            | DirectoryError::InvalidConfigValueError { .. }
            | DirectoryError::MissingConfigError { .. }
            | DirectoryError::SerializationError(_) => ErrorSeverity::High,
            DirectoryError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DirectoryError::SourceNotFound { .. } => {
                "Check the input path, or run from the directory that holds the CSV files"
            }
            DirectoryError::CsvError(_) => "Make sure the input is UTF-8 delimited text",
            DirectoryError::InvalidContact { .. } => "Every contact row needs a non-empty email",
            DirectoryError::IoError(_) => "Check file permissions and free disk space",
            DirectoryError::SerializationError(_) => "Retry without --stats-json",
            DirectoryError::ConfigValidationError { .. }
            | DirectoryError::InvalidConfigValueError { .. }
            | DirectoryError::MissingConfigError { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DirectoryError::SourceNotFound { path } => format!("找不到輸入檔案: {}", path),
            DirectoryError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值錯誤 ({}): {}", field, reason)
            }
            DirectoryError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            DirectoryError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

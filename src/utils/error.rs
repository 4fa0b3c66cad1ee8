use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Input encoding error: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Required element <{field}> not found")]
    MissingFieldError { field: String },

    #[error("Cannot parse <{field}> value '{value}': {reason}")]
    FieldParseError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::XmlError(_) | EtlError::EncodingError(_) => ErrorCategory::Parse,
            EtlError::MissingFieldError { .. }
            | EtlError::FieldParseError { .. }
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::SerializationError(_) | EtlError::CsvError(_) => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the input file path exists".to_string()
            }
            EtlError::IoError(_) => "Check file permissions and available disk space".to_string(),
            EtlError::XmlError(_) => "Make sure the input is well-formed XML".to_string(),
            EtlError::EncodingError(_) => "Save the input file as UTF-8".to_string(),
            EtlError::MissingFieldError { field } => {
                format!("Add at least one <{}> element to the order document", field)
            }
            EtlError::FieldParseError { field, .. } if field == "RequestedShipDate" => {
                "Use a date such as 2024-06-15 or 06/15/2024".to_string()
            }
            EtlError::FieldParseError { field, .. } => {
                format!("Fix the numeric value of <{}>", field)
            }
            EtlError::ValidationError { .. } => {
                "Align USPrice and Order_Quantity elements or use --price-pairing truncate"
                    .to_string()
            }
            EtlError::ProcessingError { .. } => "Check the order values for overflow".to_string(),
            EtlError::SerializationError(_) | EtlError::CsvError(_) => {
                "Try the text output format".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("An error occurred: {}", self)
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

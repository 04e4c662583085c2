use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data error: {message}")]
    DataError { message: String },

    #[error("Authentication failed (HTTP {status}): {message}")]
    AuthenticationError { status: u16, message: String },

    #[error("Rate limited by the language model service: {message}")]
    RateLimitError { message: String },

    #[error("Language model service error (HTTP {status}): {message}")]
    ServiceError { status: u16, message: String },

    #[error("Language model response had no content: {message}")]
    EmptyResponseError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    ExternalService,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn data(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::CsvError(_) | Self::DataError { .. } => ErrorCategory::Data,
            Self::ApiError(_)
            | Self::AuthenticationError { .. }
            | Self::RateLimitError { .. }
            | Self::ServiceError { .. }
            | Self::EmptyResponseError { .. } => ErrorCategory::ExternalService,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::ExternalService => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => {
                "Set API_KEY, AZURE_AI_MODEL_DEPLOYMENT_NAME, AZURE_AI_PROJECT_ENDPOINT and AZURE_AI_API_VERSION (a .env file works)"
            }
            Self::InvalidConfigValueError { .. } => "Correct the reported configuration value and run again",
            Self::CsvError(_) | Self::DataError { .. } => {
                "Check that the CSV has a header row and numeric quantity, price or revenue columns"
            }
            Self::AuthenticationError { .. } => "Verify API_KEY belongs to the configured Azure resource",
            Self::RateLimitError { .. } => "Wait for the quota window to reset before running again",
            Self::ApiError(_) => "Check network connectivity and AZURE_AI_PROJECT_ENDPOINT",
            Self::ServiceError { .. } | Self::EmptyResponseError { .. } => {
                "Check the deployment name and API version, then try again"
            }
            Self::IoError(_) => "Check that the input file exists and the output directory is writable",
            Self::SerializationError(_) => "This is an internal error; please report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not read the sales data: {}", self),
            ErrorCategory::ExternalService => format!("Report generation failed: {}", self),
            ErrorCategory::System => format!("Unexpected failure: {}", self),
        }
    }

    /// Process exit code for this error; always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrptError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected code Response{{code={status}, message={reason}, url={url}}}")]
    UnexpectedStatus {
        status: u16,
        reason: String,
        url: String,
        body: String,
    },

    #[error("Request limit must be a positive number.")]
    InvalidRequestLimit,

    #[error("Request limit {limit} exceeds the maximum of {max}")]
    RequestLimitTooLarge { limit: usize, max: usize },

    #[error("Rate limit window must be at least one millisecond")]
    InvalidTimeWindow,

    #[error("Rate limiter has been shut down")]
    RateLimiterClosed,

    #[error("No tokio runtime available to drive the rate limiter")]
    RuntimeUnavailable,

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, CrptError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    RateLimit,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼。Low 也視為失敗，沒有「警告但成功」的情況
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl CrptError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CrptError::Http(_) => ErrorCategory::Network,
            CrptError::UnexpectedStatus { .. } | CrptError::InvalidHeader { .. } => {
                ErrorCategory::Api
            }
            CrptError::Serialization(_) => ErrorCategory::Data,
            CrptError::InvalidRequestLimit
            | CrptError::RequestLimitTooLarge { .. }
            | CrptError::InvalidTimeWindow
            | CrptError::RateLimiterClosed => ErrorCategory::RateLimit,
            CrptError::ConfigError { .. }
            | CrptError::ConfigValidationError { .. }
            | CrptError::InvalidConfigValueError { .. }
            | CrptError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CrptError::Io(_) | CrptError::RuntimeUnavailable => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CrptError::Http(_) => ErrorSeverity::Medium,
            CrptError::UnexpectedStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            CrptError::UnexpectedStatus { .. } => ErrorSeverity::High,
            CrptError::Serialization(_) | CrptError::InvalidHeader { .. } => ErrorSeverity::High,
            CrptError::RateLimiterClosed => ErrorSeverity::Low,
            CrptError::InvalidRequestLimit
            | CrptError::RequestLimitTooLarge { .. }
            | CrptError::InvalidTimeWindow
            | CrptError::ConfigError { .. }
            | CrptError::ConfigValidationError { .. }
            | CrptError::InvalidConfigValueError { .. }
            | CrptError::MissingConfigError { .. } => ErrorSeverity::High,
            CrptError::Io(_) | CrptError::RuntimeUnavailable => ErrorSeverity::Critical,
        }
    }

    /// 是否值得在下一個時間窗口重試
    pub fn is_retryable(&self) -> bool {
        match self {
            CrptError::Http(e) => e.is_timeout() || e.is_connect(),
            CrptError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CrptError::Http(_) => {
                "Check network connectivity and that the CRPT API host is reachable".to_string()
            }
            CrptError::UnexpectedStatus { status: 401 | 403, .. } => {
                "Check that the signature / token is valid and not expired".to_string()
            }
            CrptError::UnexpectedStatus { status: 429, .. } => {
                "Lower request_limit or use a longer time_unit".to_string()
            }
            CrptError::UnexpectedStatus { status, .. } if *status >= 500 => {
                "The CRPT API is failing; retry later".to_string()
            }
            CrptError::UnexpectedStatus { .. } => {
                "Inspect the response body and fix the document contents".to_string()
            }
            CrptError::Serialization(_) => {
                "Check that the document JSON matches the expected structure".to_string()
            }
            CrptError::InvalidRequestLimit => "Set request_limit to 1 or more".to_string(),
            CrptError::RequestLimitTooLarge { max, .. } => {
                format!("Set request_limit to at most {}", max)
            }
            CrptError::InvalidTimeWindow => {
                "Use milliseconds or a longer time unit".to_string()
            }
            CrptError::RateLimiterClosed => {
                "Create a new client; this one has been shut down".to_string()
            }
            CrptError::RuntimeUnavailable => {
                "Create the client from inside a tokio runtime".to_string()
            }
            CrptError::InvalidHeader { .. } => {
                "Remove control characters from header names and values".to_string()
            }
            CrptError::ConfigError { .. }
            | CrptError::ConfigValidationError { .. }
            | CrptError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments".to_string()
            }
            CrptError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            CrptError::Io(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrptError::Http(_) => "Could not reach the CRPT API".to_string(),
            CrptError::UnexpectedStatus { status, body, .. } if body.is_empty() => {
                format!("CRPT API rejected the document (HTTP {})", status)
            }
            CrptError::UnexpectedStatus { status, body, .. } => {
                format!("CRPT API rejected the document (HTTP {}): {}", status, body)
            }
            other => other.to_string(),
        }
    }
}

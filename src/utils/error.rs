use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid year '{value}': {reason}")]
    InvalidYear { value: String, reason: String },

    #[error("Year {year} is outside the available range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
    Input,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidYear { .. } | Self::YearOutOfRange { .. } | Self::UnsupportedFormat { .. } => {
                ErrorCategory::Input
            }
            Self::ApiError(_) | Self::HttpStatus { .. } | Self::UrlError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 5xx and transport failures are usually worth another attempt
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidYear { .. } => "Pass years as whole numbers, e.g. --years 2020,2021",
            Self::YearOutOfRange { .. } => "Request years between 1889 and the current year",
            Self::UnsupportedFormat { .. } => "Use 'tif' or 'nc'; the default open-data source only publishes 'nc'",
            Self::ApiError(_) => "Check your network connection and the source base URL",
            Self::HttpStatus { status, .. } if *status == 404 => {
                "Check the layer name with --list-layers and the requested years"
            }
            Self::HttpStatus { .. } => "The data source rejected the request; try again later",
            Self::UrlError(_) => "Check the configured base URL",
            Self::IoError(_) => "Check that the output path exists and is writable",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid request: {}", self),
            ErrorCategory::Network => format!("Download failed: {}", self),
            ErrorCategory::Storage => format!("Could not write output: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SarError {
    #[error("Unsupported SAR release: {release}")]
    UnsupportedRelease { release: i64 },

    #[error("Workbook error: {message}")]
    Workbook { message: String },

    #[error("Missing sheet: {sheet}")]
    MissingSheet { sheet: String },

    #[error("Parts catalog error: {message}")]
    Catalog { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Report error: {message}")]
    Report { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SarError {
    pub fn unsupported_release(release: i64) -> Self {
        Self::UnsupportedRelease { release }
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook {
            message: message.into(),
        }
    }

    pub fn missing_sheet(sheet: impl Into<String>) -> Self {
        Self::MissingSheet {
            sheet: sheet.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedRelease { .. } => "UNSUPPORTED_RELEASE",
            Self::Workbook { .. } => "WORKBOOK_ERROR",
            Self::MissingSheet { .. } => "MISSING_SHEET",
            Self::Catalog { .. } => "CATALOG_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Report { .. } => "REPORT_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

pub type SarResult<T> = Result<T, SarError>;

// Conversion from common error types
impl From<calamine::Error> for SarError {
    fn from(error: calamine::Error) -> Self {
        Self::workbook(error.to_string())
    }
}

impl From<serde_json::Error> for SarError {
    fn from(error: serde_json::Error) -> Self {
        Self::catalog(error.to_string())
    }
}

impl From<csv::Error> for SarError {
    fn from(error: csv::Error) -> Self {
        Self::report(error.to_string())
    }
}

impl From<config::ConfigError> for SarError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

//! Error types and handling for Griffin

use thiserror::Error;

/// Main error type for the Griffin lookups
#[derive(Error, Debug)]
pub enum GriffinError {
    /// Network failures and timeouts talking to an upstream service
    #[error("{message}")]
    Transport { message: String },

    /// Upstream answered with a non-success HTTP status
    #[error("Status {code}")]
    Status { code: u16 },

    /// Upstream payload did not have the expected shape
    #[error("Unexpected response: {message}")]
    Parse { message: String },

    /// A title matched a disambiguation page instead of an article
    #[error("Ambiguous title, {} candidates", .options.len())]
    Ambiguous { options: Vec<String> },

    /// No content exists for the requested title
    #[error("Not found: {title}")]
    NotFound { title: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GriffinError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new status error
    #[must_use]
    pub fn status(code: u16) -> Self {
        Self::Status { code }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(title: S) -> Self {
        Self::NotFound {
            title: title.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GriffinError::Transport { .. } => {
                "Unable to reach the service. Please check your internet connection.".to_string()
            }
            GriffinError::Status { code } => format!("The service answered with status {code}."),
            GriffinError::Parse { .. } => "The service sent an unexpected answer.".to_string(),
            GriffinError::Ambiguous { .. } => {
                "The topic is ambiguous. Try a more specific query.".to_string()
            }
            GriffinError::NotFound { .. } => "Nothing was found for this query.".to_string(),
            GriffinError::Validation { message } => format!("Invalid input: {message}"),
            GriffinError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            GriffinError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for GriffinError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GriffinError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

use std::fmt;

#[derive(Debug)]
pub enum UnitrackError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    SessionError(String),
    /// The refresh endpoint could not be reached; the session is kept
    RefreshFailed(String),
    InvalidInput(String),
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl UnitrackError {
    /// True when the API rejected the request as unauthenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UnitrackError::ApiError { status: 401, .. })
    }
}

impl fmt::Display for UnitrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitrackError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            UnitrackError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            UnitrackError::SessionError(msg) => write!(f, "Session error: {}", msg),
            UnitrackError::RefreshFailed(msg) => write!(
                f,
                "Could not refresh the session ({}). Your sign-in was kept; try again.",
                msg
            ),
            UnitrackError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            UnitrackError::NetworkError(e) => write!(f, "Network error: {}", e),
            UnitrackError::Timeout => write!(f, "Request timeout"),
            UnitrackError::IoError(e) => write!(f, "IO error: {}", e),
            UnitrackError::JsonError(e) => write!(f, "JSON error: {}", e),
            UnitrackError::YamlError(e) => write!(f, "YAML error: {}", e),
            UnitrackError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for UnitrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UnitrackError::NetworkError(e) => Some(e),
            UnitrackError::IoError(e) => Some(e),
            UnitrackError::JsonError(e) => Some(e),
            UnitrackError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UnitrackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UnitrackError::Timeout
        } else {
            UnitrackError::NetworkError(err)
        }
    }
}

impl From<std::io::Error> for UnitrackError {
    fn from(err: std::io::Error) -> Self {
        UnitrackError::IoError(err)
    }
}

impl From<serde_json::Error> for UnitrackError {
    fn from(err: serde_json::Error) -> Self {
        UnitrackError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for UnitrackError {
    fn from(err: serde_yaml::Error) -> Self {
        UnitrackError::YamlError(err)
    }
}

impl From<anyhow::Error> for UnitrackError {
    fn from(err: anyhow::Error) -> Self {
        UnitrackError::Other(format!("{:#}", err))
    }
}

impl From<String> for UnitrackError {
    fn from(msg: String) -> Self {
        UnitrackError::Other(msg)
    }
}

impl From<&str> for UnitrackError {
    fn from(msg: &str) -> Self {
        UnitrackError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UnitrackError>;

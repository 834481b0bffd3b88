//! Error types for the sighting client

use thiserror::Error;

use crate::types::SightingId;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, SightingError>;

/// Client error taxonomy
#[derive(Error, Debug)]
pub enum SightingError {
    /// Server unreachable or the request never completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with an unexpected status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Server has no session for this client (401)
    #[error("Not signed in")]
    Unauthorized,

    /// Requester does not own the sighting (403 on delete)
    #[error("Sighting {0} belongs to another reporter")]
    AuthorizationDenied(SightingId),

    /// Credential token was refused by the server
    #[error("Login rejected with status {status}")]
    LoginRejected { status: u16 },

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Device position could not be obtained
    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    /// Store already holds a record with this id
    #[error("Duplicate sighting id: {0}")]
    DuplicateId(SightingId),

    /// Store holds no record with this id
    #[error("Sighting not found: {0}")]
    NotFound(SightingId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SightingError {
    /// Whether this error came from the network boundary
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SightingError::Transport(_)
                | SightingError::Server { .. }
                | SightingError::Unauthorized
                | SightingError::Json(_)
        )
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for SightingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return SightingError::Transport(format!("undecodable response: {}", err));
        }
        SightingError::Transport(err.to_string())
    }
}

impl From<toml::de::Error> for SightingError {
    fn from(err: toml::de::Error) -> Self {
        SightingError::Config(err.to_string())
    }
}

/// Failures reported by the geolocation provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// User refused the position request
    #[error("Permission denied")]
    PermissionDenied,

    /// Position could not be determined
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// Device has no geolocation capability at all
    #[error("Geolocation not supported")]
    Unsupported,
}

//! Shared error type across tally crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Required request input missing.
    BadRequest,
    /// Required setting absent or malformed.
    Config,
    /// The backing store failed.
    Store,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Config => "CONFIG",
            ClientCode::Store => "STORE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Unified error type used by core and gateway.
///
/// A store-level miss is not an error: it is reported through
/// [`crate::Lookup::NotFound`].
#[derive(Debug, Clone, Error)]
pub enum TallyError {
    #[error("missing required identifier")]
    MissingIdentifier,
    #[error("missing required setting: {0}")]
    MissingSetting(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TallyError::MissingIdentifier => ClientCode::BadRequest,
            TallyError::MissingSetting(_) | TallyError::InvalidConfig(_) => ClientCode::Config,
            TallyError::Store(_) => ClientCode::Store,
            TallyError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for errors caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self.client_code(), ClientCode::BadRequest)
    }
}

//! Shared error type across cas crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Malformed configuration.
    Config,
    /// Missing, forged, or expired bearer token.
    Unauthenticated,
    /// The catalog could not produce a descriptor.
    CatalogUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Config => "CONFIG",
            ClientCode::Unauthenticated => "UNAUTHENTICATED",
            ClientCode::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CasError>;

/// Why a catalog lookup failed.
///
/// The variants only matter for logs and metrics; the authorization decision
/// treats all of them as "catalog unavailable".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("catalog request failed: {message}")]
    Network { message: String },
    #[error("catalog answered with status {status}")]
    Status { status: u16 },
    #[error("catalog response could not be decoded: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Stable label for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
        }
    }
}

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CasError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unauthenticated")]
    Unauthenticated,
    #[error(transparent)]
    Catalog(#[from] FetchError),
    #[error("internal: {0}")]
    Internal(String),
}

impl CasError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CasError::BadRequest(_) => ClientCode::BadRequest,
            CasError::Config(_) => ClientCode::Config,
            CasError::Unauthenticated => ClientCode::Unauthenticated,
            CasError::Catalog(_) => ClientCode::CatalogUnavailable,
            CasError::Internal(_) => ClientCode::Internal,
        }
    }
}

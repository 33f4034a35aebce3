//! Error types for deploylens.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The platform rejected the credential (401/403).
    #[error("invalid API token: {0}")]
    Auth(String),

    /// Any other non-success response, network failure or undecodable body.
    #[error("request failed: {0}")]
    Transport(String),
}

impl Error {
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

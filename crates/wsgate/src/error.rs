//! Handshake error types

use thiserror::Error;

/// Error type for handshake negotiation.
///
/// Malformed client requests are not errors at this layer: the matcher
/// answers them with a 405 or 426 response. `HandshakeError` is reserved for
/// the fatal cases (strategy-internal faults and entropy failure), which
/// indicate a programming or configuration defect rather than a bad client.
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// A strategy was handed key material it cannot process
    #[error("invalid Sec-WebSocket-Key: {0}")]
    InvalidKey(String),

    /// The random source failed while generating a client key
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A strategy failed while building its success response
    #[error("protocol strategy failure: {0}")]
    Strategy(String),

    /// A negotiated header value was not legal HTTP
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Request or response construction failed
    #[error("HTTP message construction failed: {0}")]
    Http(#[from] http::Error),
}

impl HandshakeError {
    /// Create an invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a key generation error
    pub fn key_generation(msg: impl Into<String>) -> Self {
        Self::KeyGeneration(msg.into())
    }

    /// Create a strategy failure error
    pub fn strategy(msg: impl Into<String>) -> Self {
        Self::Strategy(msg.into())
    }
}

//! # wsgate
//!
//! WebSocket handshake negotiation for `http`-based servers and clients.
//!
//! This crate sits between a generic HTTP request/response layer and one or
//! more versioned WebSocket wire-protocol implementations. It decides
//! *whether and how* framing begins; it never touches frames itself.
//!
//! ## Features
//!
//! - **Server negotiation**: validate an incoming upgrade request and produce
//!   the correct success or failure response
//! - **Client construction**: build a valid upgrade request and validate the
//!   server's handshake response against it
//! - **Pluggable versions**: protocol versions are [`Protocol`] strategies
//!   tried in registration order, so new versions never touch the matcher
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsgate::ProtocolMatcher;
//! use wsgate_rfc6455::Rfc6455;
//!
//! let matcher: ProtocolMatcher<MyApp> = ProtocolMatcher::single(Rfc6455::new());
//!
//! // Server side: `request` came in over HTTP.
//! let response = matcher.negotiate_server_response(&app, &request)?;
//!
//! // Client side:
//! let request = matcher.build_client_request("ws://example.com/chat".parse()?, &[], &[])?;
//! // ... send it, read the response ...
//! assert!(matcher.validate_server_response(&request, &response));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod matcher;
mod protocol;

pub mod headers;

pub use error::HandshakeError;
pub use matcher::ProtocolMatcher;
pub use protocol::Protocol;

use bytes::Bytes;
use http_body_util::Full;

/// An HTTP request taking part in a WebSocket handshake.
///
/// Handshake requests never carry a body, so the body type is `()`. Opaque
/// per-connection capabilities (e.g. a transport upgrade handle) travel in
/// the request's [`http::Extensions`]; the matcher never reads them.
pub type HandshakeRequest = http::Request<()>;

/// An HTTP response produced by handshake negotiation.
///
/// Bodies are fully buffered [`Full<Bytes>`] so the exact byte length is
/// known before the response is handed back to the HTTP layer.
pub type HandshakeResponse = http::Response<Full<Bytes>>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        HandshakeError, HandshakeRequest, HandshakeResponse, Protocol, ProtocolMatcher,
    };
}

//! # wsgate-rfc6455
//!
//! The RFC 6455 handshake strategy (protocol version 13) for
//! [`wsgate`](https://docs.rs/wsgate).
//!
//! This crate covers the handshake rules only: nonce generation,
//! `Sec-WebSocket-Accept` derivation, and server-response validation.
//! Framing, masking, and extension negotiation belong to the wire-protocol
//! layer that takes over once the upgrade succeeds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsgate::ProtocolMatcher;
//! use wsgate_rfc6455::Rfc6455;
//!
//! let matcher: ProtocolMatcher<MyApp> = ProtocolMatcher::single(Rfc6455::new());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod key;

use bytes::Bytes;
use http::{header, Response, StatusCode};
use http_body_util::Full;
use wsgate::headers::{contains_token, header_str};
use wsgate::{HandshakeError, HandshakeRequest, HandshakeResponse, Protocol};

/// The protocol version token RFC 6455 registers.
pub const VERSION: &str = "13";

/// RFC 6455 handshake strategy.
///
/// Stateless: one instance serves any number of concurrent handshakes. The
/// only entropy it touches is the per-call client nonce.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc6455;

impl Rfc6455 {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl<A: Send + Sync> Protocol<A> for Rfc6455 {
    fn version(&self) -> &str {
        VERSION
    }

    fn matches_request(&self, request: &HandshakeRequest) -> bool {
        header_str(request.headers(), "Sec-WebSocket-Version") == VERSION
            && key::is_well_formed(header_str(request.headers(), "Sec-WebSocket-Key"))
    }

    fn generate_key(&self) -> Result<String, HandshakeError> {
        key::generate()
    }

    fn build_success_response(
        &self,
        _application: &A,
        request: &HandshakeRequest,
    ) -> Result<HandshakeResponse, HandshakeError> {
        let client_key = header_str(request.headers(), "Sec-WebSocket-Key");
        if !key::is_well_formed(client_key) {
            // matches_request vouched for the key; ending up here is a
            // routing defect, not a bad client.
            return Err(HandshakeError::invalid_key(format!(
                "not base64 for a 16-byte nonce: {client_key:?}"
            )));
        }

        let accept = key::accept(client_key);
        tracing::debug!(%accept, "accepting websocket upgrade");

        Ok(Response::builder()
            .status(StatusCode::SWITCHING_PROTOCOLS)
            .header(header::CONNECTION, "upgrade")
            .header(header::UPGRADE, "websocket")
            .header("Sec-WebSocket-Accept", accept)
            .body(Full::new(Bytes::new()))?)
    }

    fn validate_server_response(
        &self,
        request: &HandshakeRequest,
        response: &HandshakeResponse,
    ) -> bool {
        if response.status() != StatusCode::SWITCHING_PROTOCOLS {
            return false;
        }
        if !header_str(response.headers(), header::UPGRADE).eq_ignore_ascii_case("websocket") {
            return false;
        }
        if !contains_token(
            header_str(response.headers(), header::CONNECTION),
            "upgrade",
        ) {
            return false;
        }

        let client_key = header_str(request.headers(), "Sec-WebSocket-Key");
        if !key::is_well_formed(client_key) {
            return false;
        }
        header_str(response.headers(), "Sec-WebSocket-Accept") == key::accept(client_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method, Request};

    const SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";
    const SAMPLE_ACCEPT: &str = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=";

    fn request_with(version: &str, client_key: &str) -> HandshakeRequest {
        Request::builder()
            .method(Method::GET)
            .uri("/chat")
            .header(header::CONNECTION, "Upgrade")
            .header(header::UPGRADE, "websocket")
            .header("Sec-WebSocket-Version", version)
            .header("Sec-WebSocket-Key", client_key)
            .body(())
            .unwrap()
    }

    fn protocol() -> &'static dyn Protocol<()> {
        &Rfc6455
    }

    #[test]
    fn matches_version_13_with_well_formed_key() {
        assert!(protocol().matches_request(&request_with("13", SAMPLE_KEY)));
    }

    #[test]
    fn rejects_other_versions() {
        assert!(!protocol().matches_request(&request_with("7", SAMPLE_KEY)));
        assert!(!protocol().matches_request(&request_with("", SAMPLE_KEY)));
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(!protocol().matches_request(&request_with("13", "")));
        assert!(!protocol().matches_request(&request_with("13", "bogus")));
    }

    #[test]
    fn success_response_carries_accept_key() {
        let response = protocol()
            .build_success_response(&(), &request_with("13", SAMPLE_KEY))
            .unwrap();

        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(header_str(response.headers(), header::UPGRADE), "websocket");
        assert_eq!(header_str(response.headers(), header::CONNECTION), "upgrade");
        assert_eq!(
            header_str(response.headers(), "Sec-WebSocket-Accept"),
            SAMPLE_ACCEPT
        );
    }

    #[test]
    fn malformed_key_in_success_path_is_fatal() {
        let err = protocol()
            .build_success_response(&(), &request_with("13", "bogus"))
            .unwrap_err();
        assert!(matches!(err, HandshakeError::InvalidKey(_)));
    }

    #[test]
    fn validation_accepts_own_success_response() {
        let request = request_with("13", SAMPLE_KEY);
        let response = protocol().build_success_response(&(), &request).unwrap();
        assert!(protocol().validate_server_response(&request, &response));
    }

    #[test]
    fn validation_rejects_mutated_accept_value() {
        let request = request_with("13", SAMPLE_KEY);
        let mut response = protocol().build_success_response(&(), &request).unwrap();

        let mut accept = SAMPLE_ACCEPT.as_bytes().to_vec();
        accept[0] ^= 0x01;
        response.headers_mut().insert(
            "Sec-WebSocket-Accept",
            HeaderValue::from_bytes(&accept).unwrap(),
        );

        assert!(!protocol().validate_server_response(&request, &response));
    }

    #[test]
    fn validation_rejects_wrong_status() {
        let request = request_with("13", SAMPLE_KEY);
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONNECTION, "upgrade")
            .header(header::UPGRADE, "websocket")
            .header("Sec-WebSocket-Accept", SAMPLE_ACCEPT)
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert!(!protocol().validate_server_response(&request, &response));
    }

    #[test]
    fn validation_rejects_missing_headers() {
        let request = request_with("13", SAMPLE_KEY);
        let response = Response::builder()
            .status(StatusCode::SWITCHING_PROTOCOLS)
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert!(!protocol().validate_server_response(&request, &response));
    }
}

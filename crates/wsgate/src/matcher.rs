//! Protocol matcher: gatekeeper between HTTP and WebSocket protocol strategies

use crate::headers::{contains_token, header_str};
use crate::{HandshakeError, HandshakeRequest, HandshakeResponse, Protocol};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode, Uri};
use http_body_util::Full;

const SEC_WEBSOCKET_VERSION: &str = "Sec-WebSocket-Version";
const SEC_WEBSOCKET_KEY: &str = "Sec-WebSocket-Key";
const SEC_WEBSOCKET_PROTOCOL: &str = "Sec-WebSocket-Protocol";
const SEC_WEBSOCKET_EXTENSION: &str = "Sec-WebSocket-Extension";

/// Routes handshake requests to the protocol strategy whose version matches.
///
/// A matcher owns a fixed, ordered set of [`Protocol`] strategies for its
/// lifetime and holds no other state: every operation is a pure function of
/// its inputs, so one instance can serve arbitrarily many concurrent
/// handshakes without locking.
///
/// `A` is the opaque application capability passed through to strategies on
/// a successful server-side upgrade; the matcher never inspects it.
pub struct ProtocolMatcher<A> {
    protocols: Vec<Box<dyn Protocol<A>>>,
}

impl<A> ProtocolMatcher<A> {
    /// Create a matcher over an ordered set of protocol strategies.
    ///
    /// Registration order is significant: when several strategies claim the
    /// same request, the first registered wins, and the first strategy is
    /// the one used for client-side key generation and response validation.
    ///
    /// # Panics
    ///
    /// Panics if `protocols` is empty. A matcher with no strategies is a
    /// configuration fault, not a runtime condition.
    pub fn new(protocols: Vec<Box<dyn Protocol<A>>>) -> Self {
        assert!(
            !protocols.is_empty(),
            "ProtocolMatcher requires at least one protocol strategy"
        );
        Self { protocols }
    }

    /// Create a matcher over a single protocol strategy.
    pub fn single(protocol: impl Protocol<A> + 'static) -> Self {
        Self::new(vec![Box::new(protocol)])
    }

    /// Version tokens of every configured strategy, in registration order.
    ///
    /// This is the single source for both the `Sec-WebSocket-Version`
    /// failure header and client request construction; it is stable across
    /// calls on the same matcher.
    pub fn supported_versions(&self) -> Vec<&str> {
        self.protocols.iter().map(|p| p.version()).collect()
    }

    /// Answer an incoming HTTP request with the appropriate handshake
    /// response.
    ///
    /// Checks run in order and the first failure wins: method, upgrade
    /// headers, protocol version. A request failing any of them gets a
    /// 405/426 refusal with a plain-text body; a request claimed by a
    /// strategy gets that strategy's success response verbatim. Strategy
    /// failures propagate as [`HandshakeError`]; they are defects, not bad
    /// requests.
    pub fn negotiate_server_response(
        &self,
        application: &A,
        request: &HandshakeRequest,
    ) -> Result<HandshakeResponse, HandshakeError> {
        if request.method() != Method::GET {
            tracing::debug!(method = %request.method(), "handshake refused: method is not GET");
            return refusal(
                StatusCode::METHOD_NOT_ALLOWED,
                "Only GET requests allowed for WebSocket connections.",
            );
        }

        let connection = header_str(request.headers(), header::CONNECTION);
        let upgrade = header_str(request.headers(), header::UPGRADE);
        if !contains_token(connection, "upgrade") || !upgrade.eq_ignore_ascii_case("websocket") {
            tracing::debug!(%connection, %upgrade, "handshake refused: missing upgrade headers");
            return refusal(
                StatusCode::UPGRADE_REQUIRED,
                "Must upgrade to WebSocket connection for requested resource.",
            );
        }

        let Some(protocol) = self.protocols.iter().find(|p| p.matches_request(request)) else {
            tracing::debug!(
                version = header_str(request.headers(), SEC_WEBSOCKET_VERSION),
                "handshake refused: no strategy matched the declared version"
            );
            let mut response =
                refusal(StatusCode::UPGRADE_REQUIRED, "Unsupported protocol version.")?;
            response.headers_mut().insert(
                SEC_WEBSOCKET_VERSION,
                HeaderValue::from_str(&self.supported_versions().join(", "))?,
            );
            return Ok(response);
        };

        protocol.build_success_response(application, request)
    }

    /// Build a client upgrade request for `uri`.
    ///
    /// The `Sec-WebSocket-Key` is generated fresh by the first registered
    /// strategy on every call; two otherwise-identical requests differ only
    /// in that header. `subprotocols` and `extensions` are joined `", "` in
    /// caller order and omitted entirely when empty.
    pub fn build_client_request(
        &self,
        uri: Uri,
        subprotocols: &[&str],
        extensions: &[&str],
    ) -> Result<HandshakeRequest, HandshakeError> {
        let key = self.primary().generate_key()?;
        tracing::debug!(%uri, "building client upgrade request");

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::CONNECTION, "upgrade")
            .header(header::UPGRADE, "websocket")
            .header(SEC_WEBSOCKET_VERSION, self.supported_versions().join(", "))
            .header(SEC_WEBSOCKET_KEY, key);

        if !subprotocols.is_empty() {
            builder = builder.header(SEC_WEBSOCKET_PROTOCOL, subprotocols.join(", "));
        }
        if !extensions.is_empty() {
            builder = builder.header(SEC_WEBSOCKET_EXTENSION, extensions.join(", "));
        }

        Ok(builder.body(())?)
    }

    /// Check a server's handshake response against the client request that
    /// produced it.
    ///
    /// Delegates to the first registered strategy, the one whose key went
    /// into the request. Returns `false` on any validation failure; never
    /// errors.
    pub fn validate_server_response(
        &self,
        request: &HandshakeRequest,
        response: &HandshakeResponse,
    ) -> bool {
        self.primary().validate_server_response(request, response)
    }

    fn primary(&self) -> &dyn Protocol<A> {
        // new() guarantees a non-empty set
        self.protocols[0].as_ref()
    }
}

/// Build a plain-text refusal with the headers every failed negotiation
/// carries: `Connection: close`, `Upgrade: websocket`, an exact
/// `Content-Length`, and `Content-Type: text/plain`.
fn refusal(
    status: StatusCode,
    message: &'static str,
) -> Result<HandshakeResponse, HandshakeError> {
    let body = Bytes::from_static(message.as_bytes());
    Ok(Response::builder()
        .status(status)
        .header(header::CONNECTION, "close")
        .header(header::UPGRADE, "websocket")
        .header(header::CONTENT_LENGTH, body.len())
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(body))?)
}

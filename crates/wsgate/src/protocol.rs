//! The protocol strategy contract

use crate::{HandshakeError, HandshakeRequest, HandshakeResponse};

/// A versioned WebSocket handshake strategy.
///
/// Each implementation encapsulates one wire-protocol version's handshake
/// rules: how a client key is generated, what the server derives from it,
/// and how a client checks the server's answer. The
/// [`ProtocolMatcher`](crate::ProtocolMatcher) tries registered strategies in
/// order and hands the handshake to the first one that claims the request,
/// so new versions can be added without touching the matcher.
///
/// `A` is the application capability seeded into a connection on a
/// successful upgrade. Strategies receive it by reference and the matcher
/// never inspects it.
///
/// Implementations must be stateless per handshake: every method is a pure
/// function of its inputs apart from [`generate_key`](Protocol::generate_key),
/// which draws fresh entropy on each call. This is what makes a single
/// matcher safe to share across arbitrarily many concurrent handshakes.
pub trait Protocol<A>: Send + Sync {
    /// Stable version token advertised for this strategy, e.g. `"13"` for
    /// RFC 6455.
    fn version(&self) -> &str;

    /// True iff the request's declared version and key material conform to
    /// this strategy's rules. Pure predicate; must not fail.
    fn matches_request(&self, request: &HandshakeRequest) -> bool;

    /// Produce a fresh, unpredictable client key.
    ///
    /// Keys must come from a cryptographically secure source and must never
    /// repeat across calls. An entropy failure is fatal, not retryable.
    fn generate_key(&self) -> Result<String, HandshakeError>;

    /// Build the success response for a request this strategy has already
    /// claimed via [`matches_request`](Protocol::matches_request).
    ///
    /// The status code and headers are defined by the wire protocol, not by
    /// the matcher. A failure here indicates a defect upstream and is
    /// propagated as-is.
    fn build_success_response(
        &self,
        application: &A,
        request: &HandshakeRequest,
    ) -> Result<HandshakeResponse, HandshakeError>;

    /// Check a server's handshake response against the client request that
    /// prompted it.
    ///
    /// Recomputes the expected derived value from the request's key and
    /// compares. Returns `false` on any mismatch or missing header; never
    /// panics.
    fn validate_server_response(
        &self,
        request: &HandshakeRequest,
        response: &HandshakeResponse,
    ) -> bool;
}

//! Header helpers shared by the matcher and protocol strategies

use http::header::AsHeaderName;
use http::HeaderMap;

/// Look up a header as a string, treating absent or non-UTF-8 values as `""`.
///
/// Handshake checks do not distinguish "absent" from "present but empty".
pub fn header_str<K>(headers: &HeaderMap, name: K) -> &str
where
    K: AsHeaderName,
{
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// True if a comma-separated header value contains `token`, comparing each
/// element case-insensitively after trimming surrounding whitespace.
///
/// `Connection: keep-alive, Upgrade` must be recognised as carrying the
/// `upgrade` token.
pub fn contains_token(value: &str, token: &str) -> bool {
    value
        .split(',')
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(token))
}

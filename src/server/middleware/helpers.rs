//! Helper functions for middleware

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceRequest;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};

/// Identifier used when no peer address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Pick the client address `trusted_hops` proxies away.
///
/// The candidates are the TCP peer followed by the `X-Forwarded-For` entries
/// from right to left. With zero trusted hops the peer is used; with `n` the
/// entry at index `n`, or the left-most one when the header is shorter.
/// Entries further left are client-controlled and never consulted.
pub fn client_identifier(
    peer: Option<&str>,
    forwarded_for: Option<&str>,
    trusted_hops: usize,
) -> String {
    let Some(peer) = peer.map(str::trim).filter(|p| !p.is_empty()) else {
        return UNKNOWN_CLIENT.to_string();
    };

    if trusted_hops == 0 {
        return peer.to_string();
    }

    let mut chain = vec![peer];
    if let Some(header) = forwarded_for {
        chain.extend(
            header
                .rsplit(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty()),
        );
    }

    let index = trusted_hops.min(chain.len() - 1);
    chain[index].to_string()
}

/// Client identifier of a request
pub fn request_client_id(req: &ServiceRequest, trusted_hops: usize) -> String {
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let forwarded_for = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok());
    client_identifier(peer.as_deref(), forwarded_for, trusted_hops)
}

/// Bearer token of an `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Session token from the cookie, falling back to a bearer header
///
/// `cookie` is the request's session cookie as returned by `req.cookie(name)`.
pub fn extract_token(cookie: Option<Cookie<'_>>, headers: &HeaderMap) -> Option<String> {
    cookie
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(headers))
}

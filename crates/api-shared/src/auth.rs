use quill_core::SessionToken;

/// Extracts the session token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` if the header is missing, uses another scheme, or carries a blank token.
/// A missing token is not an error: the request simply runs as the anonymous session.
pub fn bearer_token(header_value: Option<&str>) -> Option<SessionToken> {
    let value = header_value?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    SessionToken::from_client(token)
}

mod extractor;
mod middleware;

pub use extractor::AuthSession;
pub use middleware::require_auth;

use axum::http::{header, HeaderMap};

pub(crate) enum TokenError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
}

impl TokenError {
    pub(crate) fn message(&self) -> &'static str {
        match self {
            TokenError::MissingHeader => "Missing Authorization header",
            TokenError::InvalidHeader => "Invalid Authorization header",
            TokenError::InvalidFormat => "Invalid Authorization header format",
        }
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::MissingHeader)?;
    let auth_str = auth_header.to_str().map_err(|_| TokenError::InvalidHeader)?;
    auth_str
        .strip_prefix("Bearer ")
        .ok_or(TokenError::InvalidFormat)
}

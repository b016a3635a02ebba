use crate::api::error_json;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use family_table_core::Session;

use super::bearer_token;

/// Extractor that provides the signed-in user's session.
///
/// Reuses the session `require_auth` resolved for this request; otherwise
/// resolves the bearer token itself.
/// ```ignore
/// async fn my_handler(AuthSession(session): AuthSession) -> impl IntoResponse {
///     // session.user.email is the caller
/// }
/// ```
pub struct AuthSession(pub Session);

pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        error_json(StatusCode::UNAUTHORIZED, self.0)
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(AuthSession(session.clone()));
        }

        let ctx = AppState::from_ref(state);
        let token = bearer_token(&parts.headers).map_err(|e| AuthRejection(e.message()))?;

        let session = ctx
            .authenticate(token)
            .await
            .map_err(|_| AuthRejection("Invalid or expired token"))?;

        Ok(AuthSession(session))
    }
}

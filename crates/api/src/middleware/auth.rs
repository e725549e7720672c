//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::{bearer_token, AuthContext};

/// Rejects requests without a valid access token.
///
/// The resolved [`AuthContext`] is stored in request extensions for the rate
/// limiter and handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth = match bearer_token(req.headers())
        .and_then(|token| AuthContext::authenticate(&state.jwt, token))
    {
        Ok(auth) => auth,
        Err(e) => {
            tracing::debug!(error = %e, "Authentication failed");
            return e.into_response();
        }
    };

    req.extensions_mut().insert(auth);
    next.run(req).await
}

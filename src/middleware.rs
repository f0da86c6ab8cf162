use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use ring::hmac;

use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

const ADMIN_TAG_CONTEXT: &[u8] = b"classboard-admin-token";

/// Holds an HMAC tag of the configured admin token, never the token itself,
/// so a presented token is checked with `hmac::verify` in constant time.
pub struct AdminGate {
    key: hmac::Key,
    tag: hmac::Tag,
}

impl AdminGate {
    pub fn new(token: &str) -> Self {
        let key = hmac::Key::new(hmac::HMAC_SHA256, ADMIN_TAG_CONTEXT);
        let tag = hmac::sign(&key, token.as_bytes());
        Self { key, tag }
    }

    pub fn verify(&self, presented: &str) -> bool {
        hmac::verify(&self.key, presented.as_bytes(), self.tag.as_ref()).is_ok()
    }
}

pub async fn mw_require_admin(
    State(data): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let gate = match &data.admin {
        Some(gate) => gate,
        None => return Err(StatusCode::NOT_FOUND),
    };

    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|header| header.to_str().ok());

    match presented {
        Some(token) if gate.verify(token) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("rejected admin request with wrong token");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

//! Admin-key authorization for the RPC surface.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rotasched_domain::DomainError;

use crate::AppState;

/// Extractor that enforces the shared admin key on every route in this
/// surface. Every Rotasched RPC operation is an admin-facing scheduling
/// action, unlike the teacher where the equivalent key gated only
/// observability endpoints.
pub struct AdminUser;

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = DomainError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.config.admin_api_key.as_str();
        if expected.is_empty() {
            return Err(DomainError::PermissionDenied(
                "admin API is disabled: no ADMIN_API_KEY configured".to_string(),
            ));
        }

        let provided = parts
            .headers
            .get("x-admin-key")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| DomainError::PermissionDenied("missing x-admin-key header".to_string()))?;

        if provided != expected {
            return Err(DomainError::PermissionDenied("invalid admin key".to_string()));
        }

        Ok(Self)
    }
}

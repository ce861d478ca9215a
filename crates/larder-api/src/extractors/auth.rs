//! `AuthUser` extractor: authenticates the bearer token and builds the
//! request context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use larder_entity::account::RequiredPrincipal;
use larder_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of the current request.
///
/// The principal class the route accepts is read from the
/// [`RequiredPrincipal`] extension set by the router; routes without one
/// accept any class.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let required = parts
            .extensions
            .get::<RequiredPrincipal>()
            .copied()
            .unwrap_or_default();

        let principal = state.session_manager.authenticate(header, required).await?;
        Ok(AuthUser(RequestContext::new(principal)))
    }
}

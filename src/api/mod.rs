//! API handlers for the catalog REST endpoints

pub mod books;
pub mod health;
pub mod home;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{AccessDecision, TokenClaims},
    error::AppError,
    AppState,
};

/// Extractor for the authenticated caller, populated by the access-policy
/// middleware. Write handlers use it to obtain the audit principal.
pub struct AuthenticatedUser(pub TokenClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))
    }
}

/// Middleware enforcing the route access policy.
///
/// A bearer token, when present, is verified first; a token that fails
/// verification is rejected regardless of the route. Verified claims are
/// stored in request extensions for handlers to pick up. Stateless: nothing
/// is remembered between requests.
pub async fn enforce_access_policy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match bearer_token(request.headers()) {
        Some(token) => Some(
            TokenClaims::from_token(token, &state.config.auth.jwt_secret)
                .map_err(|e| AppError::Authentication(format!("Invalid bearer token: {}", e)))?,
        ),
        None => None,
    };

    let decision = state
        .policy
        .decide(request.method(), request.uri().path(), claims.as_ref());

    match decision {
        AccessDecision::Allow => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(claims);
            }
            Ok(next.run(request).await)
        }
        AccessDecision::Unauthenticated => Err(AppError::Authentication(
            "Missing bearer token".to_string(),
        )),
        AccessDecision::Forbidden { required_authority } => Err(AppError::Authorization {
            required_authority: required_authority.to_string(),
        }),
    }
}

/// Extract the bearer token from the Authorization header, if any
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}

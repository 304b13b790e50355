//! Bearer credential and request scope extractors

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use account_service::RequestScope;
use std::convert::Infallible;

use crate::response::ApiError;
use crate::state::AppState;

/// Raw bearer credential from the `Authorization` header.
///
/// A missing header or a non-Bearer scheme yields `None`; validation is
/// left to the services.
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        Ok(BearerToken(token))
    }
}

/// Per-request scope: one unit of work bound to the caller's credential
pub struct Scoped(pub RequestScope);

#[async_trait]
impl<S> FromRequestParts<S> for Scoped
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = match BearerToken::from_request_parts(parts, state).await {
            Ok(BearerToken(bearer)) => bearer,
            Err(never) => match never {},
        };
        let app_state = AppState::from_ref(state);
        let scope = app_state.service_context().scope(bearer).await?;
        Ok(Scoped(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Option<String> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        match BearerToken::from_request_parts(&mut parts, &()).await {
            Ok(BearerToken(token)) => token,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn test_bearer_header() {
        assert_eq!(extract(Some("Bearer abc.def.ghi")).await.as_deref(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_missing_or_other_scheme() {
        assert!(extract(None).await.is_none());
        assert!(extract(Some("Basic dXNlcjpwYXNz")).await.is_none());
    }
}

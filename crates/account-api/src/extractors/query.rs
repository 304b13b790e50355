//! Query string and path extractors with JSON error responses

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use account_service::dto::PageRequest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::response::ApiError;

/// Query string extractor that rejects with [`ApiError::InvalidQuery`]
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(QueryParams(params))
    }
}

/// Account id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(IdPath(id))
    }
}

/// `?accessToken=` of the validation endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessTokenParams {
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
}

/// Doctor directory search: paging plus an optional name filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorSearchParams {
    pub from: Option<i64>,
    pub count: Option<i64>,
    /// Case-insensitive substring of the full name
    #[serde(rename = "nameFilter", alias = "name_filter")]
    pub name_filter: Option<String>,
}

impl DoctorSearchParams {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            from: self.from,
            count: self.count,
        }
    }
}

//! Authentication handlers
//!
//! Endpoints for registration, sign-in, sign-out, token validation and
//! refresh-token rotation.

use account_core::TokenPayload;
use account_service::dto::{
    CredentialsResponse, MessageResponse, RefreshTokenRequest, SignInRequest, SignUpRequest,
};
use account_service::AuthService;
use axum::{extract::State, Json};

use crate::extractors::{AccessTokenParams, QueryParams, Scoped, ValidatedJson};
use crate::response::{ApiResult, Created, ErrorBody, NoContent};
use crate::state::AppState;

/// Register a new account
///
/// POST /api/Authentication/SignUp
#[utoipa::path(
    post,
    path = "/api/Authentication/SignUp",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody),
    )
)]
pub async fn sign_up(
    Scoped(scope): Scoped,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    AuthService::new(&scope).sign_up(request).await?;
    Ok(Created(Json(MessageResponse::account_created())))
}

/// Exchange username and password for credentials
///
/// POST /api/Authentication/SignIn
#[utoipa::path(
    post,
    path = "/api/Authentication/SignIn",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Fresh credential pair", body = CredentialsResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Bad credentials or deleted account", body = ErrorBody),
    )
)]
pub async fn sign_in(
    Scoped(scope): Scoped,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<CredentialsResponse>> {
    let response = AuthService::new(&scope).sign_in(request).await?;
    Ok(Json(response))
}

/// Drop the caller's refresh session
///
/// PUT /api/Authentication/SignOut
#[utoipa::path(
    put,
    path = "/api/Authentication/SignOut",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
    )
)]
pub async fn sign_out(Scoped(scope): Scoped) -> ApiResult<NoContent> {
    AuthService::new(&scope).sign_out().await?;
    Ok(NoContent)
}

/// Introspect an access token
///
/// GET /api/Authentication/Validate?accessToken=
#[utoipa::path(
    get,
    path = "/api/Authentication/Validate",
    tag = "Authentication",
    params(AccessTokenParams),
    responses(
        (status = 200, description = "Claims of a live token", body = TokenPayload),
        (status = 400, description = "Missing accessToken", body = ErrorBody),
        (status = 401, description = "Invalid or expired token", body = ErrorBody),
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<AccessTokenParams>,
) -> ApiResult<Json<TokenPayload>> {
    let payload = AuthService::validate(state.service_context(), &params.access_token)?;
    Ok(Json(payload))
}

/// Rotate a refresh token
///
/// POST /api/Authentication/Refresh
#[utoipa::path(
    post,
    path = "/api/Authentication/Refresh",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Rotated credential pair", body = CredentialsResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Refresh token unknown, used or expired", body = ErrorBody),
    )
)]
pub async fn refresh(
    Scoped(scope): Scoped,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<CredentialsResponse>> {
    let response = AuthService::new(&scope)
        .refresh(&request.refresh_token)
        .await?;
    Ok(Json(response))
}

//! Account handlers
//!
//! Self-service profile endpoints and administrator account management.

use account_core::AccountInfo;
use account_service::dto::{AccountRequest, MessageResponse, PageRequest, UpdateMeRequest};
use account_service::AccountService;
use axum::Json;

use crate::extractors::{IdPath, QueryParams, Scoped, ValidatedJson};
use crate::response::{ApiResult, Created, ErrorBody, NoContent};

/// Get the calling account
///
/// GET /api/Accounts/Me
#[utoipa::path(
    get,
    path = "/api/Accounts/Me",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Calling account", body = AccountInfo),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
    )
)]
pub async fn get_me(Scoped(scope): Scoped) -> ApiResult<Json<AccountInfo>> {
    let account = AccountService::new(&scope).get_me().await?;
    Ok(Json(account))
}

/// Update the calling account
///
/// PUT /api/Accounts/Update
#[utoipa::path(
    put,
    path = "/api/Accounts/Update",
    tag = "Accounts",
    security(("bearer" = [])),
    request_body = UpdateMeRequest,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody),
    )
)]
pub async fn update_me(
    Scoped(scope): Scoped,
    ValidatedJson(request): ValidatedJson<UpdateMeRequest>,
) -> ApiResult<NoContent> {
    AccountService::new(&scope).update_me(request).await?;
    Ok(NoContent)
}

/// List every account (ADMIN)
///
/// GET /api/Accounts?from=&count=
#[utoipa::path(
    get,
    path = "/api/Accounts",
    tag = "Accounts",
    security(("bearer" = [])),
    params(PageRequest),
    responses(
        (status = 200, description = "Page of accounts, inactive included", body = [AccountInfo]),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 403, description = "Caller is not an administrator", body = ErrorBody),
    )
)]
pub async fn all_accounts(
    Scoped(scope): Scoped,
    QueryParams(page): QueryParams<PageRequest>,
) -> ApiResult<Json<Vec<AccountInfo>>> {
    let accounts = AccountService::new(&scope).all_accounts(page).await?;
    Ok(Json(accounts))
}

/// Create an account (ADMIN)
///
/// POST /api/Accounts
#[utoipa::path(
    post,
    path = "/api/Accounts",
    tag = "Accounts",
    security(("bearer" = [])),
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid body or missing password", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 403, description = "Caller is not an administrator", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody),
    )
)]
pub async fn create_account(
    Scoped(scope): Scoped,
    ValidatedJson(request): ValidatedJson<AccountRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    AccountService::new(&scope).create_account(request).await?;
    Ok(Created(Json(MessageResponse::account_created())))
}

/// Update an account (ADMIN)
///
/// PUT /api/Accounts/:id
#[utoipa::path(
    put,
    path = "/api/Accounts/{id}",
    tag = "Accounts",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = AccountRequest,
    responses(
        (status = 204, description = "Account updated"),
        (status = 400, description = "Invalid body or empty roles", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 403, description = "Caller is not an administrator", body = ErrorBody),
        (status = 404, description = "No such account", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody),
    )
)]
pub async fn update_account(
    Scoped(scope): Scoped,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<AccountRequest>,
) -> ApiResult<NoContent> {
    AccountService::new(&scope)
        .update_account(id, request)
        .await?;
    Ok(NoContent)
}

/// Soft-delete an account (ADMIN)
///
/// DELETE /api/Accounts/:id
#[utoipa::path(
    delete,
    path = "/api/Accounts/{id}",
    tag = "Accounts",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deactivated and signed out"),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 403, description = "Caller is not an administrator", body = ErrorBody),
        (status = 404, description = "No such account", body = ErrorBody),
        (status = 410, description = "Account already deleted", body = ErrorBody),
    )
)]
pub async fn delete_account(Scoped(scope): Scoped, IdPath(id): IdPath) -> ApiResult<NoContent> {
    AccountService::new(&scope).delete_account(id).await?;
    Ok(NoContent)
}

//! Doctor directory handlers

use account_core::AccountInfo;
use account_service::AccountService;
use axum::Json;

use crate::extractors::{DoctorSearchParams, IdPath, QueryParams, Scoped};
use crate::response::{ApiResult, ErrorBody};

/// GET /api/Doctors?nameFilter=&from=&count=
#[utoipa::path(
    get,
    path = "/api/Doctors",
    tag = "Doctors",
    security(("bearer" = [])),
    params(DoctorSearchParams),
    responses(
        (status = 200, description = "Page of active doctors", body = [AccountInfo]),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
    )
)]
pub async fn all_doctors(
    Scoped(scope): Scoped,
    QueryParams(params): QueryParams<DoctorSearchParams>,
) -> ApiResult<Json<Vec<AccountInfo>>> {
    let page = params.page();
    let doctors = AccountService::new(&scope)
        .all_doctors(page, params.name_filter)
        .await?;
    Ok(Json(doctors))
}

/// GET /api/Doctors/:id
#[utoipa::path(
    get,
    path = "/api/Doctors/{id}",
    tag = "Doctors",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Doctor account id")),
    responses(
        (status = 200, description = "Active doctor", body = AccountInfo),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorBody),
        (status = 404, description = "No active doctor with this id", body = ErrorBody),
    )
)]
pub async fn doctor_identified(
    Scoped(scope): Scoped,
    IdPath(id): IdPath,
) -> ApiResult<Json<AccountInfo>> {
    let doctor = AccountService::new(&scope).doctor_identified(id).await?;
    Ok(Json(doctor))
}

//! OpenAPI document and Swagger UI
//!
//! The document is served at `/api/openapi.json` and browsed at
//! `/api/ui-swagger`. Both sit outside the rate limit.

use account_common::ErrorResponse;
use account_core::{AccountInfo, Role, TokenPayload};
use account_service::dto::{
    AccountRequest, CredentialsResponse, HealthChecks, HealthResponse, MessageResponse,
    ReadinessResponse, RefreshTokenRequest, SignInRequest, SignUpRequest, UpdateMeRequest,
};
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{accounts, auth, doctors, health};
use crate::response::ErrorBody;
use crate::state::AppState;

/// Swagger UI mount point
pub const SWAGGER_UI_PATH: &str = "/api/ui-swagger";

/// Raw document route
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Account API", description = "Accounts, credentials and the doctor directory"),
    paths(
        auth::sign_up,
        auth::sign_in,
        auth::sign_out,
        auth::validate,
        auth::refresh,
        accounts::get_me,
        accounts::update_me,
        accounts::all_accounts,
        accounts::create_account,
        accounts::update_account,
        accounts::delete_account,
        doctors::all_doctors,
        doctors::doctor_identified,
        health::health_check,
        health::readiness_check
    ),
    components(
        schemas(
            AccountInfo,
            Role,
            TokenPayload,
            SignUpRequest,
            SignInRequest,
            RefreshTokenRequest,
            UpdateMeRequest,
            AccountRequest,
            CredentialsResponse,
            MessageResponse,
            HealthResponse,
            ReadinessResponse,
            HealthChecks,
            ErrorBody,
            ErrorResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Authentication", description = "Registration, sign-in and token rotation"),
        (name = "Accounts", description = "Profile and administrator account management"),
        (name = "Doctors", description = "Directory of active doctors"),
        (name = "Health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected operations
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI plus the JSON document it renders
pub fn swagger_routes() -> Router<AppState> {
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}

//! HTTP middleware for the account API
//!
//! Layers, outermost first: global rate limit, request id, trace span,
//! timeout, CORS.

use std::sync::Arc;
use std::time::Duration;

use account_common::{AppError, AppResult, CorsConfig, RateLimitConfig};
use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Wrap the API routes with the middleware stack
pub fn apply_middleware_with_config(
    router: Router<AppState>,
    rate_limit: &RateLimitConfig,
    cors: &CorsConfig,
    is_production: bool,
) -> AppResult<Router<AppState>> {
    // The bucket is shared by every caller and refills one permit per interval
    let refill_every_ms = (1000 / u64::from(rate_limit.requests_per_second.max(1))).max(1);
    let governor = GovernorConfigBuilder::default()
        .per_millisecond(refill_every_ms)
        .burst_size(rate_limit.burst.max(1))
        .key_extractor(GlobalKeyExtractor)
        .finish()
        .ok_or_else(|| AppError::Config("invalid rate limit configuration".to_string()))?;

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            let authenticated = request.headers().contains_key(header::AUTHORIZATION);

            tracing::info_span!(
                "account_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
                authenticated,
            )
        })
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Ok(router
        .layer(cors_layer(cors, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
        .layer(GovernorLayer {
            config: Arc::new(governor),
        }))
}

/// Build the CORS policy.
///
/// With no configured origins, development allows any origin and production
/// allows none.
fn cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id_header(),
        ])
        .expose_headers([request_id_header(), header::WWW_AUTHENTICATE]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; cross-origin requests are refused");
            return layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        tracing::warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS outside development");
        return layer.allow_origin(Any);
    }

    let origins = parse_origins(&config.allowed_origins);
    tracing::info!(count = origins.len(), "CORS origins configured");
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Parse configured origins, skipping values that are not valid header values
fn parse_origins(raw: &[String]) -> Vec<HeaderValue> {
    raw.iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

//! API routes for carbond
//!
//! Error bodies are always `{"detail": "..."}`.

use crate::registry::SubscribeOutcome;
use crate::server::AppState;
use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use carbon_common::{
    ActivityCatalog, ActivityRecord, ApiInfo, CalculationRequest, CategoriesResponse,
    EmissionResult, ErrorBody, HealthResponse, MessageResponse, SubscribeRequest, Subscriber,
    TipRequest,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern compiles")
});

/// Server-side address check, stricter than the form's `@` test
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    fn invalid_email() -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid email address")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `Json` whose rejections are reported as `{"detail"}` bodies
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Query` whose rejections are reported as `{"detail"}` bodies
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

// ============================================================================
// Info Routes
// ============================================================================

pub fn info_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Carbon Footprint Tracker API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
    })
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: format!(
            "API is running successfully (up {}s)",
            state.start_time.elapsed().as_secs()
        ),
    })
}

// ============================================================================
// Emission Routes
// ============================================================================

pub fn emission_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/emissions/activities", get(get_activities))
        .route("/api/emissions/categories", get(get_categories))
        .route("/api/emissions/calculate", post(calculate))
        .route("/api/emissions/history/:email", get(get_history))
}

async fn get_activities(State(state): State<AppStateArc>) -> Json<ActivityCatalog> {
    Json(state.emissions.catalog())
}

async fn get_categories(State(state): State<AppStateArc>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.emissions.categories(),
    })
}

async fn calculate(
    State(state): State<AppStateArc>,
    ApiJson(req): ApiJson<CalculationRequest>,
) -> ApiResult<EmissionResult> {
    if !req.quantity.is_finite() || req.quantity <= 0.0 {
        return Err(ApiError::bad_request("Quantity must be a positive number"));
    }
    if let Some(email) = &req.user_email {
        if !is_valid_email(email) {
            return Err(ApiError::invalid_email());
        }
    }

    let result = state
        .emissions
        .calculate(&req.activity_type, req.quantity)
        .ok_or_else(|| {
            warn!("  Unknown activity: {}", req.activity_type);
            ApiError::bad_request(format!("Activity type '{}' not found", req.activity_type))
        })?;

    if let Some(email) = &req.user_email {
        state.users.write().await.ensure(email);
        state.activity_log.write().await.record(email, &result);
    }

    info!(
        "  {} x {} = {} kg CO₂",
        result.activity_type, result.quantity, result.co2_emissions
    );
    Ok(Json(result))
}

async fn get_history(
    State(state): State<AppStateArc>,
    Path(email): Path<String>,
) -> Json<Vec<ActivityRecord>> {
    let log = state.activity_log.read().await;
    Json(log.history(&email, state.history_limit))
}

// ============================================================================
// User Routes
// ============================================================================

pub fn user_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/users/subscribe", post(subscribe))
        .route("/api/users/unsubscribe", post(unsubscribe))
        .route("/api/users/send-tip", post(send_tip))
        .route("/api/users/", get(list_users))
}

async fn subscribe(
    State(state): State<AppStateArc>,
    ApiJson(req): ApiJson<SubscribeRequest>,
) -> ApiResult<Subscriber> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::invalid_email());
    }

    let outcome = state
        .users
        .write()
        .await
        .subscribe(&req.email, req.is_subscribed);

    match outcome {
        SubscribeOutcome::Created(user) => {
            info!("  New subscriber #{}", user.id);
            let mailer = Arc::clone(&state.mailer);
            let email = user.email.clone();
            tokio::spawn(async move {
                mailer.send_welcome(&email);
            });
            Ok(Json(user))
        }
        SubscribeOutcome::Resubscribed(user) => {
            info!("  Subscriber #{} re-subscribed", user.id);
            Ok(Json(user))
        }
        SubscribeOutcome::AlreadySubscribed => {
            Err(ApiError::bad_request("User is already subscribed"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

async fn unsubscribe(
    State(state): State<AppStateArc>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<MessageResponse> {
    if !state.users.write().await.unsubscribe(&query.email) {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(MessageResponse {
        message: "Successfully unsubscribed".to_string(),
    }))
}

async fn send_tip(
    State(state): State<AppStateArc>,
    ApiJson(req): ApiJson<TipRequest>,
) -> ApiResult<MessageResponse> {
    let subscribed = state
        .users
        .read()
        .await
        .get(&req.email)
        .map(|user| user.is_subscribed)
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !subscribed {
        return Err(ApiError::bad_request("User is not subscribed"));
    }

    let mailer = Arc::clone(&state.mailer);
    tokio::spawn(async move {
        mailer.send_weekly_tip(&req.email);
    });

    Ok(Json(MessageResponse {
        message: "Weekly tip will be sent shortly".to_string(),
    }))
}

async fn list_users(State(state): State<AppStateArc>) -> Json<Vec<Subscriber>> {
    Json(state.users.read().await.all())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("@example.com"));
    }
}

//! Client flow tests against a stub API.
//!
//! The stub serves the one-category catalog `transport/car` with a factor of
//! 0.23 kg per km, treats `taken@example.com` as already subscribed, and
//! answers `leaky` calculations with a negative amount.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use carbon_common::{
    CalculatorState, CarbonClient, CarbonError, EmissionResult, ErrorBody, Event, ImpactBand,
    SubscribeRequest, Subscriber, SubscriptionForm, ValidationError,
};
use carbon_common::wire::CalculationRequest;
use serde_json::json;

async fn activities() -> Json<serde_json::Value> {
    Json(json!({
        "transport": {
            "car": {"name": "Car", "unit": "kg/km", "description": "..."}
        }
    }))
}

async fn calculate(
    Json(req): Json<CalculationRequest>,
) -> Result<Json<EmissionResult>, (StatusCode, Json<ErrorBody>)> {
    match req.activity_type.as_str() {
        "car" => Ok(Json(EmissionResult {
            activity_type: req.activity_type,
            quantity: req.quantity,
            co2_emissions: ((0.23 * req.quantity) * 1000.0_f64).round() / 1000.0,
            unit: "kg/km".to_string(),
        })),
        "leaky" => Ok(Json(EmissionResult {
            activity_type: req.activity_type,
            quantity: req.quantity,
            co2_emissions: -1.0,
            unit: "kg/km".to_string(),
        })),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                detail: format!("Activity type '{}' not found", other),
            }),
        )),
    }
}

async fn subscribe(
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<Subscriber>, (StatusCode, Json<ErrorBody>)> {
    if req.email == "taken@example.com" {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                detail: "User is already subscribed".to_string(),
            }),
        ));
    }
    if req.email == "broken@example.com" {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                detail: "Internal server error".to_string(),
            }),
        ));
    }
    Ok(Json(Subscriber {
        id: 1,
        email: req.email,
        is_subscribed: req.is_subscribed,
        created_at: chrono::Utc::now(),
    }))
}

async fn spawn_stub() -> CarbonClient {
    let app = Router::new()
        .route("/api/emissions/activities", get(activities))
        .route("/api/emissions/calculate", post(calculate))
        .route("/api/users/subscribe", post(subscribe));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    CarbonClient::new(format!("http://{}", addr))
}

#[tokio::test]
async fn test_end_to_end_car_is_moderate() {
    let client = spawn_stub().await;
    let mut state = CalculatorState::new();

    let catalog = client.fetch_catalog().await.unwrap();
    state.handle(Event::CatalogLoaded(catalog)).unwrap();
    assert_eq!(state.selected_activity(), Some("car"));

    state.handle(Event::SetQuantity("10".into())).unwrap();
    let view = state.calculate(&client, None).await.unwrap();

    let result = state.result().unwrap();
    assert_eq!(result.activity_type, "car");
    assert_eq!(result.quantity, 10.0);
    assert_eq!(result.co2_emissions, 2.3);
    assert_eq!(result.unit, "kg/km");
    assert_eq!(view.band, ImpactBand::Moderate);
    assert_eq!(view.activity_name, "Car");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_unknown_activity_is_calculation_error() {
    let client = spawn_stub().await;
    let err = client.calculate("rocket", 1.0, None).await.unwrap_err();
    match err {
        CarbonError::Calculation(detail) => {
            assert_eq!(detail, "Activity type 'rocket' not found")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_negative_emissions_rejected_at_boundary() {
    let client = spawn_stub().await;
    let err = client.calculate("leaky", 1.0, None).await.unwrap_err();
    assert!(matches!(err, CarbonError::Calculation(_)));
}

#[tokio::test]
async fn test_invalid_quantity_sends_nothing() {
    let client = spawn_stub().await;
    let mut state = CalculatorState::new();
    state
        .handle(Event::CatalogLoaded(client.fetch_catalog().await.unwrap()))
        .unwrap();
    state.handle(Event::SetQuantity("abc".into())).unwrap();

    let err = state.calculate(&client, None).await.unwrap_err();
    assert!(matches!(
        err,
        CarbonError::Validation(ValidationError::InvalidQuantity)
    ));
    assert!(state.result().is_none());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_subscribe_flows() {
    let client = spawn_stub().await;

    let mut form = SubscriptionForm::new();
    form.set_email("new@example.com");
    let subscriber = form.submit(&client).await.unwrap();
    assert_eq!(subscriber.email, "new@example.com");
    assert_eq!(form.email(), "");

    form.set_email("taken@example.com");
    let err = form.submit(&client).await.unwrap_err();
    assert!(matches!(err, CarbonError::AlreadySubscribed));
    assert_eq!(err.user_message(), "This email is already subscribed!");
    assert_eq!(form.email(), "taken@example.com");

    form.set_email("broken@example.com");
    let err = form.submit(&client).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to subscribe. Please try again.");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = CarbonClient::new("http://127.0.0.1:9");
    let err = client.fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CarbonError::Network(_)));
}

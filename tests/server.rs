use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use getaround_pricing::artifact::{publish, ArtifactKey};
use getaround_pricing::dataset::{synthetic, Frame};
use getaround_pricing::server::{router, AppState};
use getaround_pricing::storage::MemoryBlobStore;
use getaround_pricing::{PricingPipeline, Predictor};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> axum::Router {
    let (records, prices) = synthetic::listings(150, 42);
    let model = PricingPipeline::default()
        .fit(&Frame::from_records(&records), &prices)
        .unwrap();
    let store = MemoryBlobStore::new();
    let key = ArtifactKey::new("models", "getaround_pricing", "servertest");
    publish(&store, "artifacts", &key, &model).unwrap();
    let predictor = Predictor::load(&store, "artifacts", &key.to_string()).unwrap();
    router(AppState::new(predictor))
}

fn bmw() -> Value {
    json!({
        "model_key": "BMW",
        "mileage": 50000,
        "engine_power": 110,
        "fuel": "diesel",
        "paint_color": "black",
        "car_type": "suv",
        "private_parking_available": false,
        "has_gps": false,
        "has_air_conditioning": false,
        "automatic_car": false,
        "has_getaround_connect": false,
        "has_speed_regulator": false,
        "winter_tires": false
    })
}

async fn post_predict(body: String) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_index_and_health() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "models/getaround_pricing_servertest.bin");
}

#[tokio::test]
async fn test_predict_bmw() {
    let (status, body) = post_predict(bmw().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let price = body["rental_price"].as_f64().unwrap();
    let cents = price * 100.0;
    assert!((cents - cents.round()).abs() < 1e-6);
}

#[tokio::test]
async fn test_unknown_brand_is_422() {
    let mut request = bmw();
    request["model_key"] = "Tesla".into();
    let (status, body) = post_predict(request.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("Tesla"));
}

#[tokio::test]
async fn test_out_of_range_is_422() {
    let mut request = bmw();
    request["mileage"] = 300_001.into();
    let (status, body) = post_predict(request.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("mileage"));

    let mut request = bmw();
    request["engine_power"] = (-1).into();
    let (status, _) = post_predict(request.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_bodies_are_422() {
    let mut request = bmw();
    request["has_gps"] = "yes".into();
    let (status, body) = post_predict(request.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let mut request = bmw();
    request.as_object_mut().unwrap().remove("fuel");
    let (status, _) = post_predict(request.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_predict("{not json".to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

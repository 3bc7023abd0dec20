use crate::error::{PricingError, ValidationError};
use crate::predictor::Prediction;
use crate::schema::CarFeatures;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// A [`PricingError`] rendered as `{"error": <kind>, "detail": <message>}`.
#[derive(Debug)]
pub struct ApiError(pub PricingError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PricingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E: Into<PricingError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self.0 {
            PricingError::Validation(inner) => inner.to_string(),
            PricingError::Inference(msg) => msg.clone(),
            other => other.to_string(),
        };
        let body = Json(json!({ "error": self.0.kind(), "detail": detail }));
        (self.status(), body).into_response()
    }
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Getaround rental pricing API. POST a listing to /predict."
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let meta = state.predictor.meta();
    Json(json!({
        "status": "ok",
        "model": state.predictor.model_key(),
        "run_id": meta.run_id,
        "created_at": meta.created_at,
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<CarFeatures>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(features) =
        payload.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;

    match state.predictor.predict_features(features) {
        Ok(prediction) => {
            tracing::info!(rental_price = prediction.rental_price, "prediction served");
            Ok(Json(prediction))
        }
        Err(err) => {
            match &err {
                PricingError::Validation(e) => tracing::info!(error = %e, "request rejected"),
                e => tracing::error!(error = %e, "prediction failed"),
            }
            Err(ApiError(err))
        }
    }
}

//! HTTP surface over the [`Predictor`].
//!
//! - `GET /` welcome message
//! - `GET /health` status and pinned artifact
//! - `POST /predict` one listing in, `{"rental_price": ..}` out

pub mod handlers;

use crate::error::Result;
use crate::predictor::Predictor;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub use handlers::ApiError;

/// Router state: the predictor loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let model_key = state.predictor.model_key().to_string();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, model = %model_key, "pricing API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;
    Ok(())
}

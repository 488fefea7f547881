//! Diabetes risk prediction service
//!
//! Serves a logistic regression classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      diabetes-server                         │
//! │                                                              │
//! │  Router (axum) ──► handlers ──► ModelManager                 │
//! │   CORS, gzip,                   ├─ RwLock<ProcessState>      │
//! │   tracing                       └─ publish lock              │
//! │                                        │                     │
//! ├────────────────────────────────────────┼─────────────────────┤
//! │  diabetes-learning                     ▼                     │
//! │  Trainer ──► TrainedModel ◄──► ModelStore (JSON artifact)    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  diabetes-data                                               │
//! │  schema, DatasetLoader (polars CSV)                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Routes
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/api/predict` | POST | [`handlers::model::predict`] |
//! | `/api/model-info` | GET | [`handlers::model::info`] |
//! | `/api/retrain` | POST | [`handlers::model::retrain`] |
//! | `/health` | GET | [`handlers::health::check`] |

pub mod config;
pub mod error;
pub mod handlers;
pub mod input;
pub mod manager;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::{Args, ServerConfig};
pub use error::{ServiceError, ServiceResult};
pub use manager::{ActiveModel, ModelInfo, ModelManager, ModelStatus, PredictionResult};
pub use state::AppState;

// One manager is shared by every request.
static_assertions::assert_impl_all!(ModelManager: Send, Sync);
static_assertions::assert_impl_all!(AppState: Send, Sync, Clone);

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/predict", post(handlers::model::predict))
        .route("/api/model-info", get(handlers::model::info))
        .route("/api/retrain", post(handlers::model::retrain))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! Shared application state
//!
//! Cloned into every handler by axum's `State` extractor. The clone is cheap:
//! all fields are reference-counted.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::manager::ModelManager;

#[derive(Clone)]
pub struct AppState {
    /// The single model lifecycle manager.
    pub manager: Arc<ModelManager>,

    /// When the process started serving.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(manager: Arc<ModelManager>) -> Self {
        Self {
            manager,
            started_at: Utc::now(),
        }
    }
}

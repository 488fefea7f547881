//! HTTP-level tests driving the router in-process.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use diabetes_learning::{ModelStore, Trainer, TrainerConfig};
use diabetes_server::{AppState, ModelManager, create_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../crates/diabetes-data/tests/fixtures/diabetes_sample.csv")
}

fn manager(dir: &TempDir, dataset: PathBuf) -> Arc<ModelManager> {
    Arc::new(ModelManager::new(
        ModelStore::new(dir.path().join("diabetes_model.json")),
        dataset,
        Trainer::new(TrainerConfig::default()),
    ))
}

/// Router over a manager that has already loaded or trained its model.
fn ready_app(dir: &TempDir) -> (Router, Arc<ModelManager>) {
    let manager = manager(dir, fixture());
    manager.initialize().expect("initialize");
    (create_router(AppState::new(Arc::clone(&manager))), manager)
}

fn patient() -> Value {
    json!({
        "pregnancies": 6,
        "glucose": 148,
        "bloodPressure": 72,
        "skinThickness": 35,
        "insulin": 0,
        "bmi": 33.6,
        "diabetesPedigreeFunction": 0.627,
        "age": 50
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

// ============================================================================
// /api/predict
// ============================================================================

#[tokio::test]
async fn test_predict_returns_full_result() {
    let dir = TempDir::new().unwrap();
    let (app, manager) = ready_app(&dir);

    let (status, body) = send(app, post_json("/api/predict", &patient())).await;

    assert_eq!(status, StatusCode::OK);
    let prediction = body["prediction"].as_u64().unwrap();
    assert!(prediction <= 1);
    let expected_text = if prediction == 1 { "Diabetes" } else { "Tidak Diabetes" };
    assert_eq!(body["prediction_text"], expected_text);

    let p0 = body["probability"]["no_diabetes"].as_f64().unwrap();
    let p1 = body["probability"]["diabetes"].as_f64().unwrap();
    assert!((p0 + p1 - 1.0).abs() < 1e-6);
    assert_eq!(body["confidence"].as_f64().unwrap(), p0.max(p1));

    let accuracy = manager.snapshot().unwrap().accuracy.unwrap();
    assert_eq!(body["model_accuracy"].as_f64().unwrap(), accuracy);
    assert!(body.get("generation").is_none());
}

#[tokio::test]
async fn test_predict_missing_field() {
    let dir = TempDir::new().unwrap();
    let (app, _) = ready_app(&dir);
    let mut input = patient();
    input.as_object_mut().unwrap().remove("skinThickness");

    let (status, body) = send(app, post_json("/api/predict", &input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: skinThickness");
    assert_eq!(body["code"], "MISSING_FIELD");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_predict_invalid_value() {
    let dir = TempDir::new().unwrap();
    let (app, _) = ready_app(&dir);
    let mut input = patient();
    input["glucose"] = json!("abc");

    let (status, body) = send(app, post_json("/api/predict", &input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("glucose") && message.contains("abc"), "{message}");
}

#[tokio::test]
async fn test_predict_accepts_numeric_strings() {
    let dir = TempDir::new().unwrap();
    let (app, _) = ready_app(&dir);
    let mut input = patient();
    input["glucose"] = json!("148");
    input["bmi"] = json!("33.6");

    let (status, _) = send(app, post_json("/api/predict", &input)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let dir = TempDir::new().unwrap();
    let (app, _) = ready_app(&dir);
    let request = Request::post("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"glucose\": "))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_predict_before_initialize_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir, fixture());
    let app = create_router(AppState::new(manager));

    let (status, body) = send(app, post_json("/api/predict", &patient())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "MODEL_UNAVAILABLE");
}

// ============================================================================
// /api/model-info
// ============================================================================

#[tokio::test]
async fn test_model_info() {
    let dir = TempDir::new().unwrap();
    let (app, manager) = ready_app(&dir);

    let (status, body) = send(app, get("/api/model-info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "model_type": "Logistic Regression",
            "accuracy": manager.snapshot().unwrap().accuracy,
            "features": [
                "Pregnancies", "Glucose", "BloodPressure", "SkinThickness",
                "Insulin", "BMI", "DiabetesPedigreeFunction", "Age"
            ],
            "status": "ready"
        })
    );
}

#[tokio::test]
async fn test_model_info_after_failed_startup() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir, dir.path().join("missing.csv"));
    assert!(manager.initialize().is_err());
    let app = create_router(AppState::new(manager));

    let (status, body) = send(app, get("/api/model-info")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "MODEL_UNAVAILABLE");
}

// ============================================================================
// /api/retrain
// ============================================================================

#[tokio::test]
async fn test_retrain_replaces_model() {
    let dir = TempDir::new().unwrap();
    let (app, manager) = ready_app(&dir);
    let before = manager.snapshot().unwrap().generation;

    let (status, body) = send(app, post_json("/api/retrain", &json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Model retrained successfully");
    let accuracy = body["accuracy"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));

    let active = manager.snapshot().unwrap();
    assert_eq!(active.generation, before + 1);
    assert_eq!(active.accuracy, Some(accuracy));
}

#[tokio::test]
async fn test_retrain_failure_keeps_old_model() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("diabetes.csv");
    std::fs::copy(fixture(), &dataset).unwrap();
    let manager = manager(&dir, dataset.clone());
    manager.initialize().unwrap();
    let app = create_router(AppState::new(Arc::clone(&manager)));

    std::fs::remove_file(&dataset).unwrap();
    let (status, body) = send(app.clone(), post_json("/api/retrain", &json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to retrain model"));
    assert_eq!(body["code"], "DATASET_NOT_FOUND");

    let (status, _) = send(app, post_json("/api/predict", &patient())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(manager.snapshot().unwrap().generation, 1);
}

// ============================================================================
// /health
// ============================================================================

#[tokio::test]
async fn test_health_reports_model_status() {
    let dir = TempDir::new().unwrap();
    let (app, _) = ready_app(&dir);

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_status"], "ready");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_before_initialize() {
    let dir = TempDir::new().unwrap();
    let app = create_router(AppState::new(manager(&dir, fixture())));

    let (_, body) = send(app, get("/health")).await;
    assert_eq!(body["model_status"], "uninitialized");
}

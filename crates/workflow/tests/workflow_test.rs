//! Integration tests for the workflow components, run against a mock
//! SkinMorph API with scriptable failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api_gateway::{ApiGateway, GatewayConfig, ImageUpload};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use credential_store::{CredentialStore, MemoryStore};
use serde_json::{json, Value};
use skinmorph_common::Error;
use workflows::relay::{WorkflowPayload, WorkflowRelay};
use workflows::timeline::{
    observation_line, TimelineAggregator, EMPTY_TIMELINE_MESSAGE,
};
use workflows::{referral, SimulationDriver};

struct MockState {
    timeline_body: Value,
    /// Timeline calls at or beyond this index return a 500.
    timeline_fail_after: usize,
    /// Sequence calls at or beyond this index return a 500.
    sequence_fail_after: usize,
    report_is_pdf: bool,
    timeline_calls: AtomicUsize,
    sequence_calls: AtomicUsize,
}

impl MockState {
    fn new(timeline_body: Value) -> Self {
        Self {
            timeline_body,
            timeline_fail_after: usize::MAX,
            sequence_fail_after: usize::MAX,
            report_is_pdf: true,
            timeline_calls: AtomicUsize::new(0),
            sequence_calls: AtomicUsize::new(0),
        }
    }
}

async fn mock_predict() -> Json<Value> {
    Json(json!({
        "prediction": {
            "top_class": {"label": "melanocytic_nevus", "probability": 0.82},
            "gradcam_overlay_png_b64": "aW1hZ2U="
        },
        "recommendations": [{
            "title": "Monitor",
            "summary": "Photograph the lesion monthly.",
            "evidence_level": "low",
            "when_to_see_doctor": "If it changes in size, shape, or color."
        }]
    }))
}

async fn mock_predict_sequence(State(state): State<Arc<MockState>>) -> (StatusCode, Json<Value>) {
    let call = state.sequence_calls.fetch_add(1, Ordering::SeqCst);
    if call >= state.sequence_fail_after {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "model backend unavailable"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "risks": {
                "30d": {"pigmentation_risk": 0.12, "acne_risk": 0.05, "wrinkle_risk": 0.08},
                "6mo": {"pigmentation_risk": 0.34, "acne_risk": 0.11, "wrinkle_risk": 0.21},
                "1yr": {"pigmentation_risk": 0.57, "acne_risk": 0.18, "wrinkle_risk": 0.42}
            },
            "future_visuals_png_b64": {
                "30d": "dmlzdWFs",
                "6mo": "dmlzdWFs"
            }
        })),
    )
}

async fn mock_timeline(State(state): State<Arc<MockState>>) -> (StatusCode, Json<Value>) {
    let call = state.timeline_calls.fetch_add(1, Ordering::SeqCst);
    if call >= state.timeline_fail_after {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "database unavailable"})),
        );
    }
    (StatusCode::OK, Json(state.timeline_body.clone()))
}

async fn mock_report(State(state): State<Arc<MockState>>) -> Vec<u8> {
    if state.report_is_pdf {
        b"%PDF-1.4 mock report".to_vec()
    } else {
        b"<html>maintenance page</html>".to_vec()
    }
}

async fn spawn_mock_api(state: MockState) -> String {
    let app = Router::new()
        .route("/predict", post(mock_predict))
        .route("/predict_sequence", post(mock_predict_sequence))
        .route("/timeline", get(mock_timeline))
        .route("/report", get(mock_report))
        .with_state(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn gateway(base_url: &str) -> Arc<ApiGateway> {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn CredentialStore>;
    let config = GatewayConfig::new(base_url).unwrap();
    Arc::new(ApiGateway::new(config, store))
}

fn frame() -> ImageUpload {
    ImageUpload::png("frame.png", vec![0u8; 32])
}

#[tokio::test]
async fn test_scenario_capture_result_chain() {
    let base = spawn_mock_api(MockState::new(json!({"lesions": []}))).await;
    let gateway = gateway(&base);

    // Capture view: analyze the image and attach the outcome to a chain.
    let outcome = gateway.predict(frame()).await.unwrap();
    let relay = WorkflowRelay::new();
    let token = relay.attach(WorkflowPayload {
        outcome,
        original_image: "file:///tmp/lesion.png".to_string(),
    });

    // Result view: read the payload back through the relay.
    let payload = relay.read(&token).expect("chain should carry the payload");
    let top = &payload.outcome.prediction.top_class;
    assert_eq!(top.label, "melanocytic_nevus");
    assert_eq!(top.probability_percent(), "82.0%");
    assert_eq!(payload.outcome.recommendations[0].title, "Monitor");
    assert_eq!(payload.outcome.recommendations[0].evidence_level, "low");

    // Chain ends: later views read nothing and fall back.
    relay.finish(&token);
    assert!(relay.read(&token).is_none());
}

#[tokio::test]
async fn test_scenario_empty_timeline_renders_empty_state() {
    let base = spawn_mock_api(MockState::new(json!({"lesions": []}))).await;
    let mut aggregator = TimelineAggregator::new(gateway(&base));

    let lesions = aggregator.load().await.unwrap();
    assert!(lesions.is_empty());
    assert!(aggregator.is_empty());

    // The view renders the defined message, not an error.
    let rendered = if aggregator.is_empty() {
        EMPTY_TIMELINE_MESSAGE.to_string()
    } else {
        unreachable!()
    };
    assert_eq!(rendered, "No events yet. Use the capture flow to start tracking.");
}

#[tokio::test]
async fn test_unclassified_observation_renders_unknown() {
    let body = json!({
        "lesions": [{
            "lesion_id": 1,
            "events": [
                {"observation_id": 10, "captured_at": "2024-03-01T09:30:00"},
                {
                    "observation_id": 11,
                    "captured_at": "2024-04-01T09:30:00",
                    "top_class": "melanocytic_nevus",
                    "top_prob": 0.82
                }
            ]
        }]
    });
    let base = spawn_mock_api(MockState::new(body)).await;
    let mut aggregator = TimelineAggregator::new(gateway(&base));

    aggregator.load().await.unwrap();
    let events = &aggregator.lesions()[0].events;

    assert_eq!(observation_line(&events[0]), "Unknown");
    assert_eq!(observation_line(&events[1]), "melanocytic_nevus — 82.0%");
}

#[tokio::test]
async fn test_timeline_failure_preserves_previous_view_model() {
    let body = json!({"lesions": [{"lesion_id": 1, "events": []}]});
    let mut state = MockState::new(body);
    state.timeline_fail_after = 1;
    let base = spawn_mock_api(state).await;

    let mut aggregator = TimelineAggregator::new(gateway(&base));
    aggregator.load().await.unwrap();
    assert_eq!(aggregator.lesions().len(), 1);

    let result = aggregator.load().await;
    assert!(matches!(result, Err(Error::Transport(_))));

    // The previously rendered list is untouched.
    assert_eq!(aggregator.lesions().len(), 1);
}

#[tokio::test]
async fn test_demo_simulation_covers_canonical_timepoints() {
    let base = spawn_mock_api(MockState::new(json!({"lesions": []}))).await;
    let mut driver = SimulationDriver::new(gateway(&base));

    let trajectory = driver.run_demo(frame(), 3).await.unwrap();

    assert_eq!(trajectory.ordered_timepoints(), vec!["30d", "6mo", "1yr"]);
    for scores in trajectory.risks.values() {
        for risk in [
            scores.pigmentation_risk,
            scores.acne_risk,
            scores.wrinkle_risk,
        ] {
            assert!((0.0..=1.0).contains(&risk));
        }
    }

    // A missing overlay for one time point is valid.
    assert!(trajectory.visual_for("30d").is_some());
    assert!(trajectory.visual_for("1yr").is_none());
}

#[tokio::test]
async fn test_simulation_failure_preserves_previous_trajectory() {
    let mut state = MockState::new(json!({"lesions": []}));
    state.sequence_fail_after = 1;
    let base = spawn_mock_api(state).await;

    let mut driver = SimulationDriver::new(gateway(&base));
    driver.run_demo(frame(), 3).await.unwrap();
    assert!(driver.trajectory().is_some());

    let result = driver.run(vec![frame(), frame()]).await;
    assert!(matches!(result, Err(Error::Transport(_))));

    // Previously rendered risk data is untouched.
    let held = driver.trajectory().unwrap();
    assert_eq!(held.risks.len(), 3);
}

#[tokio::test]
async fn test_simulation_rejects_empty_frame_list() {
    let base = spawn_mock_api(MockState::new(json!({"lesions": []}))).await;
    let mut driver = SimulationDriver::new(gateway(&base));

    let result = driver.run(Vec::new()).await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(driver.trajectory().is_none());
}

#[tokio::test]
async fn test_report_fetch_validates_pdf_payload() {
    let base = spawn_mock_api(MockState::new(json!({"lesions": []}))).await;
    let bytes = referral::fetch_report(&gateway(&base)).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let mut state = MockState::new(json!({"lesions": []}));
    state.report_is_pdf = false;
    let base = spawn_mock_api(state).await;
    let result = referral::fetch_report(&gateway(&base)).await;
    assert!(matches!(result, Err(Error::Payload(_))));
}

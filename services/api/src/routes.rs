use crate::infra::{AppState, InMemoryLeadStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use leadflow::error::AppError;
use leadflow::pipeline::timestamps::parse_timestamp;
use leadflow::pipeline::{
    dashboard_router, DashboardService, DashboardServiceError, LeadCsvImporter, LeadRecord,
    PipelineDashboard, PriorityWeights,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

/// Stateless scoring request: the caller supplies the snapshot and, optionally, the weights.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) leads: Vec<LeadRecord>,
    #[serde(default)]
    pub(crate) weights: Option<PriorityWeights>,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    #[serde(default)]
    pub(crate) now: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) imported: usize,
}

pub(crate) fn with_pipeline_routes(
    service: Arc<DashboardService<InMemoryLeadStore>>,
    store: InMemoryLeadStore,
) -> axum::Router {
    dashboard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/pipeline/score",
            axum::routing::post(score_endpoint),
        )
        .route(
            "/api/v1/pipeline/leads/import",
            axum::routing::post(import_endpoint),
        )
        .layer(Extension(store))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Json<PipelineDashboard> {
    let ScoreRequest {
        leads,
        weights,
        top_n,
        now,
    } = payload;

    let weights = weights.unwrap_or_else(|| state.scoring.weights.clone());
    let top_n = top_n.unwrap_or(state.scoring.top_n);
    let now = now
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Json(PipelineDashboard::build(&leads, &weights, now, top_n))
}

pub(crate) async fn import_endpoint(
    Extension(store): Extension<InMemoryLeadStore>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let leads = LeadCsvImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let imported = store
        .replace(leads)
        .map_err(DashboardServiceError::from)?;

    info!(imported, "replaced lead snapshot from CSV upload");
    Ok(Json(ImportResponse { imported }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use leadflow::config::ScoringConfig;
    use leadflow::pipeline::LeadStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            scoring: ScoringConfig::default(),
        }
    }

    fn app(store: InMemoryLeadStore, ready: bool) -> axum::Router {
        let service = Arc::new(DashboardService::new(
            Arc::new(store.clone()),
            ScoringConfig::default(),
        ));
        with_pipeline_routes(service, store).layer(Extension(app_state(ready)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn score_endpoint_reproduces_reference_scenarios() {
        let request = json!({
            "now": "2025-03-02T12:00:00Z",
            "leads": [
                {
                    "id": "won-soon",
                    "estimated_value": 5000.0,
                    "sla_hours": 24,
                    "created_at": "2025-03-01T12:00:00Z",
                    "contacted": true,
                    "inspection_scheduled": true,
                    "estimate_submitted": true
                },
                {
                    "id": "silent",
                    "estimated_value": 0.0,
                    "sla_hours": 24,
                    "created_at": "2025-03-01T12:00:00Z",
                    "inspection_scheduled": true,
                    "estimate_submitted": true
                }
            ]
        });

        let response = app(InMemoryLeadStore::default(), true)
            .oneshot(
                Request::post("/api/v1/pipeline/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let priorities = body["priorities"].as_array().expect("priorities");
        assert_eq!(priorities[0]["lead_id"], "won-soon");
        assert_eq!(priorities[0]["tier"], "CRITICAL");
        assert_eq!(priorities[0]["overdue"], true);
        assert_eq!(priorities[1]["lead_id"], "silent");
        assert_eq!(priorities[1]["tier"], "NORMAL");
        let score = priorities[1]["score"].as_f64().expect("numeric score");
        assert!((score - 0.44).abs() < 1e-9);
    }

    #[tokio::test]
    async fn score_endpoint_tolerates_integer_ids_and_bad_timestamps() {
        let request = json!({
            "now": "2025-03-02T12:00:00Z",
            "leads": [
                { "id": 41, "estimated_value": 900.0, "created_at": 1740830400 },
                { "id": 42, "estimated_value": 5000.0, "created_at": "2025-03-01T12:00:00Z" }
            ]
        });

        let response = app(InMemoryLeadStore::default(), true)
            .oneshot(
                Request::post("/api/v1/pipeline/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let priorities = body["priorities"].as_array().expect("priorities");
        assert_eq!(priorities.len(), 2);
        assert_eq!(priorities[0]["lead_id"], "42");
        assert_eq!(priorities[1]["lead_id"], "41");
        assert_eq!(priorities[1]["overdue"], false);
        assert_eq!(body["kpis"]["total_leads"], 2);
    }

    #[tokio::test]
    async fn import_replaces_store_snapshot() {
        let store = InMemoryLeadStore::default();
        let csv = "id,status,estimated_value,created_at\n1,New,1200,2025-03-01T09:00:00\n2,Awarded,4000,2025-02-20\n";

        let response = app(store.clone(), true)
            .oneshot(
                Request::post("/api/v1/pipeline/leads/import")
                    .body(Body::from(csv))
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["imported"], 2);
        assert_eq!(store.snapshot().expect("snapshot").len(), 2);
    }

    #[tokio::test]
    async fn import_rejects_malformed_csv() {
        let response = app(InMemoryLeadStore::default(), true)
            .oneshot(
                Request::post("/api/v1/pipeline/leads/import")
                    .body(Body::from("id,status\n1,New,extra\n"))
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(InMemoryLeadStore::default(), false)
            .oneshot(
                Request::get("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");
    }
}

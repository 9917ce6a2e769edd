use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::super::kpi::CreatedWindow;
use super::super::store::LeadStore;
use super::super::timestamps::deserialize_lenient;
use super::service::{DashboardService, DashboardServiceError};

/// Query parameters shared by the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub(crate) now: Option<DateTime<Utc>>,
}

impl DashboardQuery {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

/// KPI query: evaluation instant plus an optional inclusive creation-date range.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct KpiQuery {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub(crate) now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) created_from: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) created_to: Option<NaiveDate>,
}

impl KpiQuery {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn window(&self) -> CreatedWindow {
        CreatedWindow::new(self.created_from, self.created_to)
    }
}

/// Router builder exposing the ranked pipeline and KPI views.
pub fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: LeadStore + 'static,
{
    Router::new()
        .route("/api/v1/pipeline/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/pipeline/priorities", get(priorities_handler::<S>))
        .route("/api/v1/pipeline/kpis", get(kpis_handler::<S>))
        .with_state(service)
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: LeadStore + 'static,
{
    respond(service.dashboard(query.now(), query.top_n))
}

pub(crate) async fn priorities_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: LeadStore + 'static,
{
    respond(service.priorities(query.now(), query.top_n))
}

pub(crate) async fn kpis_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Query(query): Query<KpiQuery>,
) -> Response
where
    S: LeadStore + 'static,
{
    respond(service.kpis(query.now(), query.window()))
}

fn respond<T: Serialize>(result: Result<T, DashboardServiceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, axum::Json(body)).into_response(),
        Err(err) => {
            error!(error = %err, "dashboard snapshot failed");
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::pipeline::domain::LeadRecord;
    use crate::pipeline::store::StoreError;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{Duration, TimeZone};
    use serde_json::Value;
    use tower::ServiceExt;

    struct FixedStore(Vec<LeadRecord>);

    impl LeadStore for FixedStore {
        fn snapshot(&self) -> Result<Vec<LeadRecord>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct OfflineStore;

    impl LeadStore for OfflineStore {
        fn snapshot(&self) -> Result<Vec<LeadRecord>, StoreError> {
            Err(StoreError::Unavailable("database offline".to_string()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap()
    }

    fn leads() -> Vec<LeadRecord> {
        (0..10)
            .map(|index| {
                let mut lead = LeadRecord::new(index.to_string(), now() - Duration::hours(3));
                lead.estimated_value = Some(f64::from(index) * 400.0);
                lead
            })
            .collect()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn dashboard_route_ranks_and_aggregates() {
        let service = Arc::new(DashboardService::new(
            Arc::new(FixedStore(leads())),
            ScoringConfig::default(),
        ));
        let response = dashboard_router(service)
            .oneshot(
                Request::get("/api/v1/pipeline/dashboard?top_n=3&now=2025-03-02T12:00:00Z")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let priorities = body["priorities"].as_array().expect("priorities array");
        assert_eq!(priorities.len(), 3);
        assert_eq!(priorities[0]["lead_id"], "9");
        assert_eq!(body["kpis"]["total_leads"], 10);
    }

    #[tokio::test]
    async fn priorities_route_defaults_to_configured_top_n() {
        let service = Arc::new(DashboardService::new(
            Arc::new(FixedStore(leads())),
            ScoringConfig::default(),
        ));
        let response = dashboard_router(service)
            .oneshot(
                Request::get("/api/v1/pipeline/priorities")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        let body = body_json(response).await;
        assert_eq!(body.as_array().expect("array").len(), 8);
    }

    #[tokio::test]
    async fn store_failure_maps_to_service_unavailable() {
        let service = Arc::new(DashboardService::new(
            Arc::new(OfflineStore),
            ScoringConfig::default(),
        ));
        let response =
            kpis_handler::<OfflineStore>(State(service), Query(KpiQuery::default())).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("database offline"));
    }

    #[tokio::test]
    async fn kpis_route_filters_by_creation_dates() {
        let mut leads = leads();
        leads[0].created_at = Some(Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap());
        leads[1].created_at = Some(Utc.with_ymd_and_hms(2025, 2, 12, 18, 0, 0).unwrap());
        leads[2].created_at = None;
        let service = Arc::new(DashboardService::new(
            Arc::new(FixedStore(leads)),
            ScoringConfig::default(),
        ));

        let response = dashboard_router(service)
            .oneshot(
                Request::get("/api/v1/pipeline/kpis?created_from=2025-02-01&created_to=2025-02-12")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_leads"], 2);
    }
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadStore};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leadflow::config::AppConfig;
use leadflow::error::AppError;
use leadflow::pipeline::{DashboardService, LeadCsvImporter};
use leadflow::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let seed = match args.seed_csv.take() {
        Some(path) => LeadCsvImporter::from_path(&path)?,
        None => Vec::new(),
    };
    let store = InMemoryLeadStore::with_leads(seed);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        scoring: config.scoring.clone(),
    };

    let dashboard_service = Arc::new(DashboardService::new(
        Arc::new(store.clone()),
        config.scoring.clone(),
    ));

    let app = with_pipeline_routes(dashboard_service, store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        top_n = config.scoring.top_n,
        "lead pipeline service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

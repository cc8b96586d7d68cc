use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryNotificationGateway, TracingActivityLog};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stallworks::allocation::{
    spawn_sweeps, EligibilityConfig, MemoryAllocationStore, StallAllocationService,
};
use stallworks::config::AppConfig;
use stallworks::error::AppError;
use stallworks::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryAllocationStore::new());
    let notifier = Arc::new(InMemoryNotificationGateway::default());
    let activity = Arc::new(TracingActivityLog);
    let eligibility = EligibilityConfig {
        general_cooldown_days: config.allocation.general_cooldown_days,
        direct_cooldown_days: config.allocation.direct_cooldown_days,
    };
    let allocation_service = Arc::new(StallAllocationService::new(
        store,
        notifier,
        activity,
        eligibility,
        config.allocation.retention_days,
    ));

    // The sweeps run for the lifetime of the server alongside request
    // traffic, against the same transactional store.
    let _sweep_handles = spawn_sweeps(allocation_service.clone(), config.sweep);

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "stall allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

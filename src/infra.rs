use althos::config::AppConfig;
use althos::tracker::{InMemoryTrackerRepository, WellnessTrackerService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type TrackerService = WellnessTrackerService<InMemoryTrackerRepository>;

pub(crate) fn in_memory_tracker(config: &AppConfig) -> Arc<TrackerService> {
    let repository = Arc::new(InMemoryTrackerRepository::default());
    Arc::new(WellnessTrackerService::new(
        repository,
        config.sharing.policy(),
    ))
}

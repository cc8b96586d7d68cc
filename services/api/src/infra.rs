use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use stallworks::allocation::{
    ActivityEntry, ActivityLog, NotificationGateway, NotifyError, OutcomeNotice,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notification adapter standing in for the e-mail/SMS collaborator:
/// notices are logged and kept so the demo can show them.
#[derive(Default)]
pub(crate) struct InMemoryNotificationGateway {
    notices: Mutex<Vec<OutcomeNotice>>,
}

impl InMemoryNotificationGateway {
    pub(crate) fn notices(&self) -> Vec<OutcomeNotice> {
        self.notices.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationGateway for InMemoryNotificationGateway {
    fn notify(&self, notice: OutcomeNotice) -> Result<(), NotifyError> {
        info!(email = %notice.email, template = %notice.template, "notification dispatched");
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Audit adapter writing allocation transitions to the service log.
#[derive(Default)]
pub(crate) struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn record(&self, entry: ActivityEntry) {
        info!(event = ?entry.event, subject = %entry.subject, detail = %entry.detail, "allocation activity");
    }
}

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use placement_portal::config::PortalConfig;
use placement_portal::identity::{Principal, Role, SharedIdentity, TokenRegistry};
use placement_portal::store::InMemoryPortalStore;
use placement_portal::workflows::directory::DirectoryService;
use placement_portal::workflows::drives::DriveService;
use placement_portal::workflows::jobs::JobService;
use placement_portal::workflows::reports::ReportService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

/// Principal id given to the bootstrap admin token.
pub(crate) const BOOTSTRAP_ADMIN_ID: &str = "ADM0001";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Workflow services sharing one store.
pub(crate) struct PortalServices {
    pub(crate) directory: Arc<DirectoryService<InMemoryPortalStore>>,
    pub(crate) drives: Arc<DriveService<InMemoryPortalStore>>,
    pub(crate) jobs: Arc<JobService<InMemoryPortalStore>>,
    pub(crate) reports: Arc<ReportService<InMemoryPortalStore>>,
}

impl PortalServices {
    pub(crate) fn in_memory(config: &PortalConfig) -> Self {
        let store = Arc::new(InMemoryPortalStore::new());
        Self {
            directory: Arc::new(DirectoryService::new(store.clone())),
            drives: Arc::new(DriveService::new(store.clone(), config)),
            jobs: Arc::new(JobService::new(store.clone())),
            reports: Arc::new(ReportService::new(store)),
        }
    }
}

/// Token registry seeded with the configured bootstrap admin, if any.
pub(crate) fn bootstrap_identity(config: &PortalConfig) -> SharedIdentity {
    let registry = TokenRegistry::new();
    match &config.admin_token {
        Some(token) => {
            registry.register(token.clone(), Principal::new(BOOTSTRAP_ADMIN_ID, Role::SuperAdmin))
        }
        None => warn!("PORTAL_ADMIN_TOKEN is unset; admin endpoints will reject every request"),
    }
    Arc::new(registry)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub mod config;
pub mod docs;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;

use std::sync::Arc;

use commuter_shared::session::CookiePolicy;
use commuter_shared::{Backend, SessionState};
use metrics_exporter_prometheus::PrometheusHandle;

pub use routes::create_router;

pub struct AppState {
    pub config: config::AppConfig,
    pub backend: Arc<dyn Backend>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl SessionState for AppState {
    fn backend(&self) -> Arc<dyn Backend> {
        self.backend.clone()
    }

    fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            secure: self.config.secure_cookies,
        }
    }
}

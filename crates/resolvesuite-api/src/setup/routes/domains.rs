//! Domain service mounts (organizations, complaints, workflows, ...).
//!
//! The gateway does not implement domain logic. Collaborators register their routers
//! here and are nested under `/api/<service>`. A known service with no registered router
//! answers 501 through the application fallback.

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::constants::API_BASE;
use crate::handlers;
use crate::state::AppState;

/// Domain services mounted under the API base, most specific prefix first so
/// `complaints/types` is matched before `complaints`.
pub const DOMAIN_SERVICES: &[&str] = &[
    "organizations",
    "auth",
    "users",
    "departments",
    "complaints/types",
    "complaints",
    "workflows",
    "notifications",
    "feedback",
];

const COMPLAINTS: &str = "complaints";

/// Registry of collaborator routers keyed by service name.
#[derive(Default)]
pub struct DomainRoutes {
    routers: HashMap<String, Router<Arc<AppState>>>,
}

impl DomainRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the router serving `/api/<name>`. Registering a name twice replaces the
    /// earlier router.
    pub fn register(mut self, name: &str, router: Router<Arc<AppState>>) -> Self {
        let name = name.trim_matches('/').to_string();
        if !DOMAIN_SERVICES.contains(&name.as_str()) {
            tracing::warn!(service = %name, "Registering a service outside the known domain set");
        }
        self.routers.insert(name, router);
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.routers.contains_key(name)
    }

    /// Names of registered services.
    pub fn registered(&self) -> Vec<String> {
        self.routers.keys().cloned().collect()
    }

    /// Nest every registered router, plus the attachment route on `complaints`.
    pub(super) fn into_router(mut self) -> Router<Arc<AppState>> {
        let mut app = Router::new();

        let complaints = self
            .routers
            .remove(COMPLAINTS)
            .unwrap_or_default()
            .route("/attachments", post(handlers::attachments::upload_attachments));
        app = app.nest(&mount_path(COMPLAINTS), complaints);

        let mut names: Vec<String> = self.routers.keys().cloned().collect();
        names.sort();
        for name in names {
            if let Some(router) = self.routers.remove(&name) {
                tracing::debug!(service = %name, "Mounting domain routes");
                app = app.nest(&mount_path(&name), router);
            }
        }

        app
    }
}

pub fn mount_path(name: &str) -> String {
    format!("{}/{}", API_BASE, name)
}

/// The known service a request path falls under, if any.
pub fn service_for_path(path: &str) -> Option<&'static str> {
    let rest = path.strip_prefix(API_BASE)?.strip_prefix('/')?;
    DOMAIN_SERVICES.iter().copied().find(|service| {
        rest == *service
            || rest
                .strip_prefix(service)
                .is_some_and(|tail| tail.starts_with('/'))
    })
}

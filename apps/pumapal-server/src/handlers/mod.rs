//! HTTP routing.
//!
//! - study_groups: list, search, create, get, update, delete, join, leave

pub mod study_groups;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use pumapal_api::API_BASE;

use crate::cors::cors_middleware;
use crate::server::PumaPalServer;

pub const BANNER: &str = "PumaPal backend is running!";

/// The public router: banner, study group API, and `/metrics` when a recorder is installed.
pub fn router(server: PumaPalServer, metrics: Option<PrometheusHandle>) -> Router {
    let api = Router::new()
        .route(
            "/",
            get(study_groups::list_groups).post(study_groups::create_group),
        )
        .route("/search", post(study_groups::search_groups))
        .route(
            "/:id",
            get(study_groups::get_group)
                .put(study_groups::update_group)
                .delete(study_groups::delete_group),
        )
        .route("/:id/join", post(study_groups::join_group))
        .route("/:id/leave", post(study_groups::leave_group));

    let mut app = Router::new()
        .route("/", get(banner))
        .nest(API_BASE, api)
        .with_state(server);

    if let Some(handle) = metrics {
        app = app.route("/metrics", get(move || async move { handle.render() }));
    }

    app.layer(middleware::from_fn(crate::metrics::track_requests))
        .layer(middleware::from_fn(cors_middleware))
}

async fn banner() -> &'static str {
    BANNER
}

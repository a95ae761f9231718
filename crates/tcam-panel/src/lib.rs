//! HTTP control panel for thermal sensor core registers.
//!
//! A thin facade over `tcam-client`: one generic parameter route pair
//! replaces the legacy panel's per-parameter handlers, and the browser page
//! ships as an asset embedded at build time, served as-is on every request.

pub mod api;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Control panel page. Embedded once at compile time; never regenerated.
pub const PANEL_HTML: &str = include_str!("../assets/panel.html");

/// Build the service router.
pub fn router() -> Router {
    Router::new()
        .route("/", get(api::panel))
        .route("/ports", get(api::list_ports))
        .route(
            "/api/{parameter}",
            get(api::get_parameter).post(api::set_parameter),
        )
        .layer(TraceLayer::new_for_http())
}

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::historial_diario;
pub use post::{generar, procesar};

use crate::auth::guards::{allow_authenticated, require_issue_qr, require_scan_qr};

pub fn qr_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/generar",
            post(generar).route_layer(from_fn(require_issue_qr)),
        )
        .route(
            "/procesar",
            post(procesar).route_layer(from_fn(require_scan_qr)),
        )
        .route(
            "/historial-diario",
            get(historial_diario).route_layer(from_fn(allow_authenticated)),
        )
}

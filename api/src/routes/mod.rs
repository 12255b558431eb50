//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the capability guards:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Login (public)
//! - `/asistencia` → Attendance recording, status changes and anomalies
//! - `/qr` → QR token issuance, scan processing and daily history
//! - `/configuracion` → Shift (turno) configuration (admin-only)

use crate::auth::guards::allow_admin;
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod asistencia;
pub mod auth;
pub mod common;
pub mod configuracion;
pub mod health;
pub mod qr;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/asistencia", asistencia::asistencia_routes())
        .nest("/qr", qr::qr_routes())
        .nest(
            "/configuracion",
            configuracion::configuracion_routes().route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::{listar, tipos};
pub use post::{registrar_aprendiz, registrar_ficha};

use crate::auth::guards::{allow_authenticated, require_register_anomaly};

pub fn anomalias_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/anomalia/tipos",
            get(tipos).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/anomalias",
            get(listar).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/anomalia/aprendiz",
            post(registrar_aprendiz).route_layer(from_fn(require_register_anomaly)),
        )
        .route(
            "/anomalia/ficha",
            post(registrar_ficha).route_layer(from_fn(require_register_anomaly)),
        )
}

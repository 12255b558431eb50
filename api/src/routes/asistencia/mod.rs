use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod anomalias;
pub(crate) mod common;
mod get;
mod post;
mod put;

pub use get::roster;
pub use post::{guardar, registrar};
pub use put::cambiar_estado;

use crate::auth::guards::{
    allow_authenticated, require_change_attendance, require_record_attendance,
};

pub fn asistencia_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/aprendices/{ficha_id}",
            get(roster).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/registrar",
            post(registrar).route_layer(from_fn(require_record_attendance)),
        )
        .route(
            "/guardar",
            post(guardar).route_layer(from_fn(require_record_attendance)),
        )
        .route(
            "/{id}",
            put(cambiar_estado).route_layer(from_fn(require_change_attendance)),
        )
        .merge(anomalias::anomalias_routes())
}

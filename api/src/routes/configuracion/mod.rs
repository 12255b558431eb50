use axum::{Router, routing::get};
use util::state::AppState;

mod get;
mod put;

pub use get::listar_horarios;
pub use put::actualizar_horarios;

pub fn configuracion_routes() -> Router<AppState> {
    Router::new().route(
        "/horarios",
        get(listar_horarios).put(actualizar_horarios),
    )
}

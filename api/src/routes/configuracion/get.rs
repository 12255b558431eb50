use axum::{Json, extract::State, http::StatusCode};
use db::models::turno::Model as TurnoModel;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// GET /api/configuracion/horarios
///
/// Current shift configuration, ordered by start time.
pub async fn listar_horarios(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<TurnoModel>>>) {
    match TurnoModel::all(state.db()).await {
        Ok(turnos) => (
            StatusCode::OK,
            Json(ApiResponse::success(turnos, "Configuración de horarios")),
        ),
        Err(e) => domain_error(e.into()),
    }
}

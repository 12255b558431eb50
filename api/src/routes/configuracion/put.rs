use axum::{Json, extract::State, http::StatusCode};
use db::models::turno::{Model as TurnoModel, TurnoUpdate};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::domain_error;

#[derive(Deserialize)]
pub struct ActualizarHorariosRequest {
    pub turnos: Vec<TurnoUpdate>,
}

/// PUT /api/configuracion/horarios
///
/// Replaces the shift configuration. The whole batch is validated first;
/// one invalid entry rejects everything.
pub async fn actualizar_horarios(
    State(state): State<AppState>,
    Json(body): Json<ActualizarHorariosRequest>,
) -> (StatusCode, Json<ApiResponse<Vec<TurnoModel>>>) {
    if body.turnos.is_empty() {
        return domain_error(db::error::DomainError::Validation(
            "La lista de turnos está vacía".into(),
        ));
    }

    if let Err(e) = TurnoModel::update_all(state.db(), body.turnos).await {
        return domain_error(e);
    }
    tracing::info!("Shift configuration updated");

    match TurnoModel::all(state.db()).await {
        Ok(turnos) => (
            StatusCode::OK,
            Json(ApiResponse::success(turnos, "Horarios actualizados")),
        ),
        Err(e) => domain_error(e.into()),
    }
}

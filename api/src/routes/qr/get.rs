use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::asistencia::Model as AsistenciaModel;
use util::state::AppState;

use super::super::asistencia::common::AsistenciaResponse;
use super::common::HistorialQuery;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// GET /api/qr/historial-diario?ficha_id=&fecha=
///
/// Attendance records of a ficha for one date, as the gate screen shows them.
pub async fn historial_diario(
    State(state): State<AppState>,
    Query(query): Query<HistorialQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<AsistenciaResponse>>>) {
    match AsistenciaModel::for_ficha_fecha(state.db(), query.ficha_id, query.fecha).await {
        Ok(registros) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                registros.into_iter().map(Into::into).collect(),
                "Historial diario obtenido",
            )),
        ),
        Err(e) => domain_error(e.into()),
    }
}

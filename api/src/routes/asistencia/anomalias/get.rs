use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::anomalia::{CATALOGO_TIPOS, Model as AnomaliaModel, TipoAnomaliaInfo};
use util::state::AppState;

use super::common::{AnomaliaResponse, ListarQuery};
use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// GET /api/asistencia/anomalia/tipos
///
/// Fixed catalog of anomaly types for the UI.
pub async fn tipos() -> (StatusCode, Json<ApiResponse<Vec<TipoAnomaliaInfo>>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            CATALOGO_TIPOS.to_vec(),
            "Catálogo de tipos de anomalía",
        )),
    )
}

/// GET /api/asistencia/anomalias?ficha_id=&fecha=&aprendiz_id=
///
/// Anomalies of a ficha (optionally narrowed to one aprendiz) for a date.
pub async fn listar(
    State(state): State<AppState>,
    Query(query): Query<ListarQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<AnomaliaResponse>>>) {
    let db = state.db();

    let result = match query.aprendiz_id {
        Some(aprendiz_id) => {
            AnomaliaModel::get_for_student(db, aprendiz_id, query.ficha_id, query.fecha).await
        }
        None => AnomaliaModel::get_for_cohort(db, query.ficha_id, query.fecha).await,
    };

    match result {
        Ok(anomalias) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                anomalias.into_iter().map(Into::into).collect(),
                "Listado de anomalías obtenido",
            )),
        ),
        Err(e) => domain_error(e.into()),
    }
}

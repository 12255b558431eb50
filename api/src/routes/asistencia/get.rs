use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::{asistencia::Model as AsistenciaModel, ficha::Model as FichaModel};
use util::state::AppState;

use super::common::{RosterEntry, RosterQuery};
use crate::response::ApiResponse;
use crate::routes::common::domain_error;
use db::error::DomainError;

/// GET /api/asistencia/aprendices/{ficha_id}?fecha=YYYY-MM-DD
///
/// Roster of a ficha for one date: every active member, with their recorded
/// attendance for that date merged in where one exists.
pub async fn roster(
    State(state): State<AppState>,
    Path(ficha_id): Path<i64>,
    Query(query): Query<RosterQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<RosterEntry>>>) {
    let db = state.db();

    let ficha = match FichaModel::find_by_id(db, ficha_id).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return domain_error(DomainError::NotFound("Ficha no encontrada".into()));
        }
        Err(e) => return domain_error(e.into()),
    };

    let members = match FichaModel::members(db, ficha.id).await {
        Ok(m) => m,
        Err(e) => return domain_error(e.into()),
    };

    let registros = match AsistenciaModel::for_ficha_fecha(db, ficha.id, query.fecha).await {
        Ok(r) => r,
        Err(e) => return domain_error(e.into()),
    };
    let por_aprendiz: HashMap<i64, &db::models::asistencia::Model> =
        registros.iter().map(|a| (a.aprendiz_id, a)).collect();

    let roster = members
        .into_iter()
        .map(|a| {
            let registro = por_aprendiz.get(&a.id);
            RosterEntry {
                id_aprendiz: a.id,
                documento: a.documento.clone(),
                nombre: a.full_name(),
                estado: registro.map(|r| r.estado),
                asistencia_id: registro.map(|r| r.id),
                observaciones: registro.and_then(|r| r.observaciones.clone()),
            }
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(roster, "Listado de asistencia obtenido")),
    )
}

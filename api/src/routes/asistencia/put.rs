use std::net::SocketAddr;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
};
use axum_extra::{TypedHeader, headers::UserAgent};
use chrono::Utc;
use db::models::asistencia::{CambioEstado, Model as AsistenciaModel};
use util::state::AppState;

use super::common::CambiarEstadoRequest;
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// PUT /api/asistencia/{id}
///
/// Changes the status of an attendance record inside the edit window,
/// writing an audit entry with the caller's identity, address and agent.
pub async fn cambiar_estado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(body): Json<CambiarEstadoRequest>,
) -> (StatusCode, Json<ApiResponse<CambioEstado>>) {
    let ip = addr.ip().to_string();
    let agent = user_agent.as_ref().map(|ua| ua.as_str());

    match AsistenciaModel::change_status(
        state.db(),
        id,
        body.estado,
        &body.motivo,
        claims.sub,
        Some(ip.as_str()),
        agent,
        Utc::now(),
    )
    .await
    {
        Ok(cambio) => {
            tracing::info!(
                asistencia = id,
                user = claims.sub,
                no_change = cambio.no_change,
                "Attendance status change"
            );
            let mensaje = if cambio.no_change {
                "El registro ya tenía ese estado"
            } else {
                "Estado de asistencia actualizado"
            };
            (StatusCode::OK, Json(ApiResponse::success(cambio, mensaje)))
        }
        Err(e) => domain_error(e),
    }
}

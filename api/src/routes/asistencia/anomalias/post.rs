use std::net::SocketAddr;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, State},
    http::StatusCode,
};
use axum_extra::{TypedHeader, headers::UserAgent};
use chrono::Utc;
use db::models::anomalia::{Model as AnomaliaModel, NuevaAnomalia, ResultadoFicha};
use util::state::AppState;

use super::common::{AnomaliaResponse, RegistrarAprendizRequest, RegistrarFichaRequest};
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// POST /api/asistencia/anomalia/aprendiz
///
/// Registers an anomaly for one aprendiz, within the grace window.
pub async fn registrar_aprendiz(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(body): Json<RegistrarAprendizRequest>,
) -> (StatusCode, Json<ApiResponse<AnomaliaResponse>>) {
    let nueva = NuevaAnomalia {
        aprendiz_id: body.id_aprendiz,
        ficha_id: body.id_ficha,
        fecha_asistencia: body.fecha_asistencia,
        tipo: body.tipo,
        descripcion: body.descripcion,
        registrado_por: claims.sub,
        ip: Some(addr.ip().to_string()),
        user_agent: user_agent.map(|ua| ua.as_str().to_owned()),
    };

    match AnomaliaModel::record_for_student(state.db(), nueva, Utc::now()).await {
        Ok(anomalia) => {
            tracing::info!(
                anomalia = anomalia.id,
                aprendiz = body.id_aprendiz,
                ficha = body.id_ficha,
                user = claims.sub,
                "Anomaly recorded"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    anomalia.into(),
                    "Anomalía registrada exitosamente",
                )),
            )
        }
        Err(e) => domain_error(e),
    }
}

/// POST /api/asistencia/anomalia/ficha
///
/// Broadcasts an anomaly over a whole ficha: one umbrella record plus one
/// per non-present member. Duplicates are skipped; other failures are
/// reported without aborting the batch.
pub async fn registrar_ficha(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(body): Json<RegistrarFichaRequest>,
) -> (StatusCode, Json<ApiResponse<ResultadoFicha>>) {
    match AnomaliaModel::record_for_cohort(
        state.db(),
        body.id_ficha,
        body.fecha_asistencia,
        body.tipo,
        body.descripcion,
        claims.sub,
        Some(addr.ip().to_string()),
        user_agent.map(|ua| ua.as_str().to_owned()),
        Utc::now(),
    )
    .await
    {
        Ok(resultado) => {
            tracing::info!(
                ficha = body.id_ficha,
                creadas = resultado.anomalies_created,
                afectados = resultado.students_affected,
                user = claims.sub,
                "Cohort anomaly broadcast"
            );
            let mensaje = format!(
                "{} anomalías registradas para {} aprendices",
                resultado.anomalies_created, resultado.students_affected
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(resultado, mensaje)),
            )
        }
        Err(e) => domain_error(e),
    }
}

use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use db::models::asistencia::{Model as AsistenciaModel, NuevaAsistencia, ResultadoMasivo};
use util::state::AppState;

use super::common::{AsistenciaResponse, GuardarRequest, RegistrarRequest};
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;

/// POST /api/asistencia/registrar
///
/// Records attendance for a single aprendiz.
pub async fn registrar(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<RegistrarRequest>,
) -> (StatusCode, Json<ApiResponse<AsistenciaResponse>>) {
    let nueva = NuevaAsistencia {
        aprendiz_id: body.id_aprendiz,
        ficha_id: body.id_ficha,
        fecha: body.fecha,
        estado: body.estado,
        observaciones: body.observaciones,
        registrado_por: claims.sub,
    };

    match AsistenciaModel::record(state.db(), nueva, Utc::now()).await {
        Ok(registro) => {
            tracing::info!(
                asistencia = registro.id,
                aprendiz = registro.aprendiz_id,
                ficha = registro.ficha_id,
                user = claims.sub,
                "Attendance recorded"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    registro.into(),
                    "Asistencia registrada exitosamente",
                )),
            )
        }
        Err(e) => domain_error(e),
    }
}

/// POST /api/asistencia/guardar
///
/// Bulk save for one ficha and date. Entries commit independently; the
/// response reports how many were saved and which ones failed, and why.
pub async fn guardar(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<GuardarRequest>,
) -> (StatusCode, Json<ApiResponse<ResultadoMasivo>>) {
    if body.asistencias.is_empty() {
        return domain_error(db::error::DomainError::Validation(
            "La lista de asistencias está vacía".into(),
        ));
    }

    let entradas = body.asistencias.into_iter().map(Into::into).collect();

    match AsistenciaModel::record_bulk(
        state.db(),
        body.id_ficha,
        body.fecha,
        entradas,
        claims.sub,
        Utc::now(),
    )
    .await
    {
        Ok(resultado) => {
            tracing::info!(
                ficha = body.id_ficha,
                guardadas = resultado.guardadas,
                errores = resultado.errores.len(),
                user = claims.sub,
                "Bulk attendance saved"
            );
            let mensaje = if resultado.errores.is_empty() {
                format!("{} asistencias guardadas", resultado.guardadas)
            } else {
                format!(
                    "{} asistencias guardadas, {} con errores",
                    resultado.guardadas,
                    resultado.errores.len()
                )
            };
            (StatusCode::OK, Json(ApiResponse::success(resultado, mensaje)))
        }
        Err(e) => domain_error(e),
    }
}

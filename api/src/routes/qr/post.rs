use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use db::error::DomainError;
use db::models::{
    aprendiz::Model as AprendizModel,
    asistencia::{Model as AsistenciaModel, NuevaAsistencia},
    ficha_aprendiz::Model as FichaAprendizModel,
    qr_token::Model as QrTokenModel,
    turno::Model as TurnoModel,
};
use util::state::AppState;

use super::common::{GenerarRequest, GenerarResponse, ProcesarRequest, ProcesarResponse};
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;
use crate::services::email::EmailService;

/// POST /api/qr/generar
///
/// Issues a fresh single-use token for an aprendiz. When email delivery is
/// requested the aprendiz must have an address on file, checked before any
/// token is spent; a delivery failure afterwards is reported in the response
/// but never undoes the issued token.
pub async fn generar(
    State(state): State<AppState>,
    Json(body): Json<GenerarRequest>,
) -> (StatusCode, Json<ApiResponse<GenerarResponse>>) {
    let db = state.db();
    let now = Utc::now();

    let destinatario = if body.enviar_email {
        let aprendiz = match AprendizModel::find_by_id(db, body.id_aprendiz).await {
            Ok(Some(a)) => a,
            Ok(None) => {
                return domain_error(DomainError::NotFound("Aprendiz no encontrado".into()));
            }
            Err(e) => return domain_error(e.into()),
        };
        match aprendiz.email.clone() {
            Some(email) => Some((email, aprendiz.full_name())),
            None => {
                return domain_error(DomainError::Validation(
                    "El aprendiz no tiene correo electrónico registrado".into(),
                ));
            }
        }
    } else {
        None
    };

    let token = match QrTokenModel::issue(db, body.id_aprendiz, now).await {
        Ok(t) => t,
        Err(e) => return domain_error(e),
    };

    let mut email_sent = false;
    if let Some((email, nombre)) = destinatario {
        match EmailService::send_qr_email(&email, &nombre, &token.payload, token.expires_at).await
        {
            Ok(()) => email_sent = true,
            Err(e) => {
                tracing::warn!(aprendiz = token.aprendiz_id, error = %e, "QR email delivery failed");
            }
        }
    }

    tracing::info!(aprendiz = token.aprendiz_id, email_sent, "QR token issued");
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            GenerarResponse {
                token: token.token,
                payload: token.payload,
                expires_at: token.expires_at.to_rfc3339(),
                email_sent,
            },
            "Código QR generado",
        )),
    )
}

/// POST /api/qr/procesar
///
/// Validates and consumes a scanned payload, classifies the scan time
/// against the configured shifts and records the attendance. When no ficha
/// is given the aprendiz must belong to exactly one.
pub async fn procesar(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<ProcesarRequest>,
) -> (StatusCode, Json<ApiResponse<ProcesarResponse>>) {
    let db = state.db();
    let now = Utc::now();

    // Resolve the target ficha before consuming: an ambiguous scan must not
    // burn the single-use token.
    let ficha_id = match body.id_ficha {
        Some(id) => id,
        None => {
            let embedded_id: i64 = match body.payload.split('|').nth(1).and_then(|p| p.parse().ok())
            {
                Some(id) => id,
                None => {
                    return domain_error(DomainError::Validation("Código QR malformado".into()));
                }
            };
            let fichas = match FichaAprendizModel::fichas_of(db, embedded_id).await {
                Ok(f) => f,
                Err(e) => return domain_error(e.into()),
            };
            match fichas.as_slice() {
                [unica] => *unica,
                [] => {
                    return domain_error(DomainError::Validation(
                        "El aprendiz no pertenece a ninguna ficha".into(),
                    ));
                }
                _ => {
                    return domain_error(DomainError::Validation(
                        "El aprendiz pertenece a varias fichas; indique id_ficha".into(),
                    ));
                }
            }
        }
    };

    let consumido = match QrTokenModel::consume(db, &body.payload, now).await {
        Ok(c) => c,
        Err(e) => return domain_error(e),
    };
    let aprendiz = consumido.aprendiz;

    let estado = match TurnoModel::classify(db, now.time()).await {
        Ok(e) => e,
        Err(e) => return domain_error(e.into()),
    };

    let nueva = NuevaAsistencia {
        aprendiz_id: aprendiz.id,
        ficha_id,
        fecha: now.date_naive(),
        estado,
        observaciones: Some("Registro por código QR".into()),
        registrado_por: claims.sub,
    };

    match AsistenciaModel::record(db, nueva, now).await {
        Ok(registro) => {
            tracing::info!(
                aprendiz = aprendiz.id,
                ficha = registro.ficha_id,
                estado = %registro.estado,
                "Attendance recorded via QR scan"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    ProcesarResponse {
                        id_aprendiz: aprendiz.id,
                        nombre: aprendiz.full_name(),
                        id_ficha: registro.ficha_id,
                        estado: Some(registro.estado),
                        time_remaining_seconds: consumido.time_remaining_seconds,
                    },
                    "Asistencia registrada por QR",
                )),
            )
        }
        Err(e) => domain_error(e),
    }
}

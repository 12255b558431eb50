use chrono::NaiveDate;
use db::models::asistencia::{EntradaAsistencia, EstadoAsistencia};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegistrarRequest {
    pub id_aprendiz: i64,
    pub id_ficha: i64,
    pub estado: EstadoAsistencia,
    pub fecha: NaiveDate,
    pub observaciones: Option<String>,
}

#[derive(Deserialize)]
pub struct EntradaMasiva {
    pub id_aprendiz: i64,
    pub estado: EstadoAsistencia,
    pub observaciones: Option<String>,
}

#[derive(Deserialize)]
pub struct GuardarRequest {
    pub id_ficha: i64,
    pub fecha: NaiveDate,
    pub asistencias: Vec<EntradaMasiva>,
}

impl From<EntradaMasiva> for EntradaAsistencia {
    fn from(e: EntradaMasiva) -> Self {
        Self {
            aprendiz_id: e.id_aprendiz,
            estado: e.estado,
            observaciones: e.observaciones,
        }
    }
}

#[derive(Deserialize)]
pub struct CambiarEstadoRequest {
    pub estado: EstadoAsistencia,
    pub motivo: String,
}

#[derive(Serialize, Default)]
pub struct AsistenciaResponse {
    pub id: i64,
    pub id_aprendiz: i64,
    pub id_ficha: i64,
    pub fecha: String,
    pub hora: String,
    pub estado: Option<EstadoAsistencia>,
    pub observaciones: Option<String>,
    pub created_at: String,
}

impl From<db::models::asistencia::Model> for AsistenciaResponse {
    fn from(m: db::models::asistencia::Model) -> Self {
        Self {
            id: m.id,
            id_aprendiz: m.aprendiz_id,
            id_ficha: m.ficha_id,
            fecha: m.fecha.to_string(),
            hora: m.hora.format("%H:%M:%S").to_string(),
            estado: Some(m.estado),
            observaciones: m.observaciones,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct RosterQuery {
    pub fecha: NaiveDate,
}

/// One roster line: the aprendiz plus their attendance for the requested
/// date, if any was recorded.
#[derive(Serialize, Default)]
pub struct RosterEntry {
    pub id_aprendiz: i64,
    pub documento: String,
    pub nombre: String,
    pub estado: Option<EstadoAsistencia>,
    pub asistencia_id: Option<i64>,
    pub observaciones: Option<String>,
}

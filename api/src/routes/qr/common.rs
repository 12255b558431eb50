use chrono::NaiveDate;
use db::models::asistencia::EstadoAsistencia;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct GenerarRequest {
    pub id_aprendiz: i64,
    /// When true and the aprendiz has an email on file, the payload is also
    /// mailed to them.
    #[serde(default)]
    pub enviar_email: bool,
}

#[derive(Serialize, Default)]
pub struct GenerarResponse {
    pub token: String,
    pub payload: String,
    pub expires_at: String,
    pub email_sent: bool,
}

#[derive(Deserialize)]
pub struct ProcesarRequest {
    pub payload: String,
    /// Target ficha for the attendance record. Optional: when omitted the
    /// aprendiz must belong to exactly one ficha.
    pub id_ficha: Option<i64>,
}

#[derive(Serialize, Default)]
pub struct ProcesarResponse {
    pub id_aprendiz: i64,
    pub nombre: String,
    pub id_ficha: i64,
    pub estado: Option<EstadoAsistencia>,
    pub time_remaining_seconds: i64,
}

#[derive(Deserialize)]
pub struct HistorialQuery {
    pub ficha_id: i64,
    pub fecha: NaiveDate,
}

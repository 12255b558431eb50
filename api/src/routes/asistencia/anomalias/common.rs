use chrono::NaiveDate;
use db::models::anomalia::AnomaliaTipo;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegistrarAprendizRequest {
    pub id_aprendiz: i64,
    pub id_ficha: i64,
    pub fecha_asistencia: NaiveDate,
    pub tipo: AnomaliaTipo,
    pub descripcion: Option<String>,
}

#[derive(Deserialize)]
pub struct RegistrarFichaRequest {
    pub id_ficha: i64,
    pub fecha_asistencia: NaiveDate,
    pub tipo: AnomaliaTipo,
    pub descripcion: Option<String>,
}

#[derive(Deserialize)]
pub struct ListarQuery {
    pub ficha_id: i64,
    pub fecha: NaiveDate,
    pub aprendiz_id: Option<i64>,
}

#[derive(Serialize, Default)]
pub struct AnomaliaResponse {
    pub id: i64,
    pub id_aprendiz: Option<i64>,
    pub id_ficha: i64,
    pub tipo: Option<AnomaliaTipo>,
    pub descripcion: Option<String>,
    pub fecha_asistencia: String,
    pub created_at: String,
}

impl From<db::models::anomalia::Model> for AnomaliaResponse {
    fn from(m: db::models::anomalia::Model) -> Self {
        Self {
            id: m.id,
            id_aprendiz: m.aprendiz_id,
            id_ficha: m.ficha_id,
            tipo: Some(m.tipo),
            descripcion: m.descripcion,
            fecha_asistencia: m.fecha_asistencia.to_string(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use util::config;

use super::asistencia::EstadoAsistencia;
use crate::error::DomainError;

/// Secondary justification record attached to a non-present attendance day.
/// `aprendiz_id` is NULL for a cohort-wide ("umbrella") anomaly; otherwise the
/// row is scoped to one aprendiz. At most one anomaly of a given type exists
/// per (aprendiz|null, ficha, fecha_asistencia).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "anomalias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub asistencia_id: Option<i64>,
    pub aprendiz_id: Option<i64>,
    pub ficha_id: i64,
    pub tipo: AnomaliaTipo,
    pub descripcion: Option<String>,
    pub registrado_por: i64,
    pub fecha_asistencia: NaiveDate,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "anomalia_tipo_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AnomaliaTipo {
    #[sea_orm(string_value = "falla_no_justificada")]
    FallaNoJustificada,

    #[sea_orm(string_value = "falla_justificada")]
    FallaJustificada,
}

/// Static catalog entry used by the UI to render anomaly options.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TipoAnomaliaInfo {
    pub code: &'static str,
    pub display_name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// The catalog is fixed: exactly these two entries.
pub const CATALOGO_TIPOS: [TipoAnomaliaInfo; 2] = [
    TipoAnomaliaInfo {
        code: "falla_no_justificada",
        display_name: "Falla no justificada",
        color: "#dc3545",
        icon: "x-circle",
    },
    TipoAnomaliaInfo {
        code: "falla_justificada",
        display_name: "Falla justificada",
        color: "#ffc107",
        icon: "file-earmark-medical",
    },
];

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asistencia::Entity",
        from = "Column::AsistenciaId",
        to = "super::asistencia::Column::Id"
    )]
    Asistencia,
    #[sea_orm(
        belongs_to = "super::aprendiz::Entity",
        from = "Column::AprendizId",
        to = "super::aprendiz::Column::Id"
    )]
    Aprendiz,
    #[sea_orm(
        belongs_to = "super::ficha::Entity",
        from = "Column::FichaId",
        to = "super::ficha::Column::Id"
    )]
    Ficha,
}

impl Related<super::asistencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asistencia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Result of checking the registration grace window.
#[derive(Debug, Serialize)]
pub struct VentanaRegistro {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub days_elapsed: i64,
    pub days_remaining: i64,
}

/// Anomalies may be registered from the attendance date itself up to the
/// configured number of days after it. Future dates and older dates are
/// rejected with distinct messages.
pub fn validar_ventana_registro(fecha_asistencia: NaiveDate, today: NaiveDate) -> VentanaRegistro {
    let window = config::anomaly_window_days();
    let elapsed = (today - fecha_asistencia).num_days();

    if elapsed < 0 {
        return VentanaRegistro {
            valid: false,
            reason: Some("La fecha de asistencia no puede ser futura".into()),
            days_elapsed: elapsed,
            days_remaining: 0,
        };
    }
    if elapsed > window {
        return VentanaRegistro {
            valid: false,
            reason: Some(format!(
                "Han pasado {elapsed} días desde la asistencia; el plazo es de {window} días"
            )),
            days_elapsed: elapsed,
            days_remaining: 0,
        };
    }
    VentanaRegistro {
        valid: true,
        reason: None,
        days_elapsed: elapsed,
        days_remaining: window - elapsed,
    }
}

/// Input for a single-student anomaly.
#[derive(Debug, Clone)]
pub struct NuevaAnomalia {
    pub aprendiz_id: i64,
    pub ficha_id: i64,
    pub fecha_asistencia: NaiveDate,
    pub tipo: AnomaliaTipo,
    pub descripcion: Option<String>,
    pub registrado_por: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Outcome of a cohort-wide anomaly broadcast. Individual failures are
/// collected and never abort the batch.
#[derive(Debug, Default, Serialize)]
pub struct ResultadoFicha {
    pub anomalies_created: usize,
    pub students_affected: usize,
    pub errors: Vec<String>,
}

impl Model {
    /// Registers an anomaly for one aprendiz. Checks, in order: the
    /// attendance that day is not "presente", aprendiz and ficha exist, the
    /// grace window is open, and no anomaly of the same type already exists
    /// for the same (aprendiz, ficha, fecha) tuple.
    pub async fn record_for_student(
        db: &DatabaseConnection,
        nueva: NuevaAnomalia,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let estado = super::asistencia::Model::estado_for(
            db,
            nueva.aprendiz_id,
            nueva.ficha_id,
            nueva.fecha_asistencia,
        )
        .await?;
        if estado == Some(EstadoAsistencia::Presente) {
            return Err(DomainError::Validation(
                "No se puede registrar una anomalía para un aprendiz presente".into(),
            ));
        }

        if super::aprendiz::Model::find_by_id(db, nueva.aprendiz_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound("Aprendiz no encontrado".into()));
        }
        if super::ficha::Model::find_by_id(db, nueva.ficha_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound("Ficha no encontrada".into()));
        }

        let ventana = validar_ventana_registro(nueva.fecha_asistencia, now.date_naive());
        if !ventana.valid {
            let reason = ventana.reason.unwrap_or_default();
            return if ventana.days_elapsed < 0 {
                Err(DomainError::Validation(reason))
            } else {
                Err(DomainError::WindowExpired(reason))
            };
        }

        if Self::exists(
            db,
            Some(nueva.aprendiz_id),
            nueva.ficha_id,
            nueva.fecha_asistencia,
            nueva.tipo,
        )
        .await?
        {
            return Err(DomainError::Duplicate(
                "Ya existe una anomalía de este tipo para el aprendiz en esta fecha".into(),
            ));
        }

        let asistencia = super::asistencia::Model::find_by_triple(
            db,
            nueva.aprendiz_id,
            nueva.ficha_id,
            nueva.fecha_asistencia,
        )
        .await?;

        Self::insert_row(db, Some(nueva.aprendiz_id), asistencia.map(|a| a.id), nueva, now).await
    }

    /// Cohort-wide broadcast: one umbrella row (aprendiz NULL) plus one row
    /// per member whose attendance that day is not "presente" (absent, late,
    /// or no record at all). Existing duplicates are skipped silently.
    pub async fn record_for_cohort(
        db: &DatabaseConnection,
        ficha_id: i64,
        fecha_asistencia: NaiveDate,
        tipo: AnomaliaTipo,
        descripcion: Option<String>,
        registrado_por: i64,
        ip: Option<String>,
        user_agent: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ResultadoFicha, DomainError> {
        if super::ficha::Model::find_by_id(db, ficha_id).await?.is_none() {
            return Err(DomainError::NotFound("Ficha no encontrada".into()));
        }

        let ventana = validar_ventana_registro(fecha_asistencia, now.date_naive());
        if !ventana.valid {
            let reason = ventana.reason.unwrap_or_default();
            return if ventana.days_elapsed < 0 {
                Err(DomainError::Validation(reason))
            } else {
                Err(DomainError::WindowExpired(reason))
            };
        }

        let mut resultado = ResultadoFicha::default();

        // Umbrella record, skipped when it already exists.
        if !Self::exists(db, None, ficha_id, fecha_asistencia, tipo).await? {
            let umbrella = NuevaAnomalia {
                aprendiz_id: 0, // ignored, inserted as NULL below
                ficha_id,
                fecha_asistencia,
                tipo,
                descripcion: descripcion.clone(),
                registrado_por,
                ip: ip.clone(),
                user_agent: user_agent.clone(),
            };
            match Self::insert_row(db, None, None, umbrella, now).await {
                Ok(_) => resultado.anomalies_created += 1,
                Err(e) => resultado.errors.push(format!("ficha {ficha_id}: {e}")),
            }
        }

        for aprendiz in super::ficha::Model::members(db, ficha_id).await? {
            let estado = super::asistencia::Model::estado_for(
                db,
                aprendiz.id,
                ficha_id,
                fecha_asistencia,
            )
            .await?;
            // No record counts as absent.
            if estado == Some(EstadoAsistencia::Presente) {
                continue;
            }

            let nueva = NuevaAnomalia {
                aprendiz_id: aprendiz.id,
                ficha_id,
                fecha_asistencia,
                tipo,
                descripcion: descripcion.clone(),
                registrado_por,
                ip: ip.clone(),
                user_agent: user_agent.clone(),
            };
            match Self::record_for_student(db, nueva, now).await {
                Ok(_) => {
                    resultado.anomalies_created += 1;
                    resultado.students_affected += 1;
                }
                Err(DomainError::Duplicate(_)) => {}
                Err(e) => resultado
                    .errors
                    .push(format!("aprendiz {}: {e}", aprendiz.id)),
            }
        }

        Ok(resultado)
    }

    pub async fn get_for_student(
        db: &DatabaseConnection,
        aprendiz_id: i64,
        ficha_id: i64,
        fecha: NaiveDate,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::AprendizId.eq(aprendiz_id))
            .filter(Column::FichaId.eq(ficha_id))
            .filter(Column::FechaAsistencia.eq(fecha))
            .all(db)
            .await
    }

    pub async fn get_for_cohort(
        db: &DatabaseConnection,
        ficha_id: i64,
        fecha: NaiveDate,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::FichaId.eq(ficha_id))
            .filter(Column::FechaAsistencia.eq(fecha))
            .all(db)
            .await
    }

    async fn exists(
        db: &DatabaseConnection,
        aprendiz_id: Option<i64>,
        ficha_id: i64,
        fecha: NaiveDate,
        tipo: AnomaliaTipo,
    ) -> Result<bool, DbErr> {
        let mut query = Entity::find()
            .filter(Column::FichaId.eq(ficha_id))
            .filter(Column::FechaAsistencia.eq(fecha))
            .filter(Column::Tipo.eq(tipo));
        query = match aprendiz_id {
            Some(id) => query.filter(Column::AprendizId.eq(id)),
            None => query.filter(Column::AprendizId.is_null()),
        };
        Ok(query.one(db).await?.is_some())
    }

    async fn insert_row(
        db: &DatabaseConnection,
        aprendiz_id: Option<i64>,
        asistencia_id: Option<i64>,
        nueva: NuevaAnomalia,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut active = Model {
            id: 0,
            asistencia_id,
            aprendiz_id,
            ficha_id: nueva.ficha_id,
            tipo: nueva.tipo,
            descripcion: nueva.descripcion,
            registrado_por: nueva.registrado_por,
            fecha_asistencia: nueva.fecha_asistencia,
            ip: nueva.ip,
            user_agent: nueva.user_agent,
            created_at: now,
        }
        .into_active_model();
        active.id = NotSet;
        Ok(active.insert(db).await?)
    }
}

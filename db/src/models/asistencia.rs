use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use util::config;

use crate::error::DomainError;

/// One attendance record per (aprendiz, ficha, fecha). Created by the manual
/// bulk save, the single-record API call, or a QR scan; never deleted. Status
/// changes go through `change_status`, which also writes the audit trail.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "asistencias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub aprendiz_id: i64,
    pub ficha_id: i64,
    pub fecha: NaiveDate,
    pub hora: NaiveTime,
    pub estado: EstadoAsistencia,
    pub observaciones: Option<String>,
    pub registrado_por: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "estado_asistencia_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EstadoAsistencia {
    #[sea_orm(string_value = "presente")]
    Presente,

    #[sea_orm(string_value = "ausente")]
    Ausente,

    #[sea_orm(string_value = "tardanza")]
    Tardanza,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
    #[sea_orm(has_many = "super::asistencia_cambio::Entity")]
    Cambios,
    #[sea_orm(has_many = "super::anomalia::Entity")]
    Anomalias,
}

impl Related<super::aprendiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aprendiz.def()
    }
}

impl Related<super::ficha::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ficha.def()
    }
}

impl Related<super::asistencia_cambio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cambios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for a single attendance row.
#[derive(Debug, Clone)]
pub struct NuevaAsistencia {
    pub aprendiz_id: i64,
    pub ficha_id: i64,
    pub fecha: NaiveDate,
    pub estado: EstadoAsistencia,
    pub observaciones: Option<String>,
    pub registrado_por: i64,
}

/// One entry of a bulk save for a ficha/fecha pair.
#[derive(Debug, Clone, Deserialize)]
pub struct EntradaAsistencia {
    pub aprendiz_id: i64,
    pub estado: EstadoAsistencia,
    pub observaciones: Option<String>,
}

/// Per-entry outcome report of `record_bulk`. Entries commit independently;
/// partial success is expected and reported, not rolled back.
#[derive(Debug, Default, Serialize)]
pub struct ResultadoMasivo {
    pub guardadas: usize,
    pub errores: Vec<ErrorEntrada>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEntrada {
    pub aprendiz_id: i64,
    pub motivo: String,
    pub error_type: String,
}

/// Outcome of `change_status`.
#[derive(Debug, Default, Serialize)]
pub struct CambioEstado {
    pub no_change: bool,
}

/// Date-of-registration policy, applied uniformly to the manual and API
/// paths: no future dates, nothing older than the configured horizon.
pub fn validar_fecha_registro(fecha: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if fecha > today {
        return Err(DomainError::Validation(
            "No se puede registrar asistencia para una fecha futura".into(),
        ));
    }
    let max_past = config::attendance_max_past_days();
    if (today - fecha).num_days() > max_past {
        return Err(DomainError::Validation(format!(
            "La fecha supera el límite de {max_past} días hacia atrás"
        )));
    }
    Ok(())
}

impl Model {
    /// Creates one attendance record, enforcing the (aprendiz, ficha, fecha)
    /// uniqueness and the registration date policy.
    pub async fn record(
        db: &DatabaseConnection,
        nueva: NuevaAsistencia,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validar_fecha_registro(nueva.fecha, now.date_naive())?;

        let aprendiz = super::aprendiz::Model::find_by_id(db, nueva.aprendiz_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Aprendiz no encontrado".into()))?;
        if !aprendiz.active {
            return Err(DomainError::Validation("El aprendiz está inactivo".into()));
        }

        let ficha = super::ficha::Model::find_by_id(db, nueva.ficha_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Ficha no encontrada".into()))?;
        if !ficha.active {
            return Err(DomainError::Validation("La ficha está inactiva".into()));
        }

        if Self::find_by_triple(db, nueva.aprendiz_id, nueva.ficha_id, nueva.fecha)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate(
                "Ya existe un registro de asistencia para este aprendiz en esta fecha".into(),
            ));
        }

        let mut active = Model {
            id: 0,
            aprendiz_id: nueva.aprendiz_id,
            ficha_id: nueva.ficha_id,
            fecha: nueva.fecha,
            hora: now.time(),
            estado: nueva.estado,
            observaciones: nueva.observaciones,
            registrado_por: nueva.registrado_por,
            created_at: now,
        }
        .into_active_model();
        active.id = NotSet;
        Ok(active.insert(db).await?)
    }

    /// Applies `record` to each entry independently. A failing entry is
    /// reported in the outcome and does not abort the rest of the batch.
    pub async fn record_bulk(
        db: &DatabaseConnection,
        ficha_id: i64,
        fecha: NaiveDate,
        entradas: Vec<EntradaAsistencia>,
        registrado_por: i64,
        now: DateTime<Utc>,
    ) -> Result<ResultadoMasivo, DomainError> {
        let mut resultado = ResultadoMasivo::default();

        for entrada in entradas {
            let aprendiz_id = entrada.aprendiz_id;
            let nueva = NuevaAsistencia {
                aprendiz_id,
                ficha_id,
                fecha,
                estado: entrada.estado,
                observaciones: entrada.observaciones,
                registrado_por,
            };
            match Self::record(db, nueva, now).await {
                Ok(_) => resultado.guardadas += 1,
                Err(e) => resultado.errores.push(ErrorEntrada {
                    aprendiz_id,
                    error_type: e.kind().into(),
                    motivo: e.to_string(),
                }),
            }
        }

        Ok(resultado)
    }

    /// Changes the status of an existing record inside the edit window.
    ///
    /// The update and its audit entry commit in a single transaction. Setting
    /// the status it already has is a no-op that writes nothing.
    pub async fn change_status(
        db: &DatabaseConnection,
        id: i64,
        nuevo_estado: EstadoAsistencia,
        motivo: &str,
        cambiado_por: i64,
        ip: Option<&str>,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<CambioEstado, DomainError> {
        if motivo.trim().is_empty() {
            return Err(DomainError::Validation(
                "Debe indicar el motivo del cambio".into(),
            ));
        }

        let record = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound("Registro de asistencia no encontrado".into()))?;

        let window = Duration::hours(config::attendance_edit_window_hours());
        if now - record.created_at > window {
            return Err(DomainError::WindowExpired(
                "La ventana de modificación de asistencia ha expirado".into(),
            ));
        }

        if record.estado == nuevo_estado {
            return Ok(CambioEstado { no_change: true });
        }

        let txn = db.begin().await?;

        let estado_anterior = record.estado;
        let mut active: ActiveModel = record.into();
        active.estado = Set(nuevo_estado);
        active.update(&txn).await?;

        let mut cambio = super::asistencia_cambio::Model {
            id: 0,
            asistencia_id: id,
            estado_anterior,
            estado_nuevo: nuevo_estado,
            motivo: motivo.to_owned(),
            cambiado_por,
            ip: ip.map(str::to_owned),
            user_agent: user_agent.map(str::to_owned),
            changed_at: now,
        }
        .into_active_model();
        cambio.id = NotSet;
        cambio.insert(&txn).await?;

        txn.commit().await?;

        Ok(CambioEstado { no_change: false })
    }

    pub async fn find_by_triple(
        db: &DatabaseConnection,
        aprendiz_id: i64,
        ficha_id: i64,
        fecha: NaiveDate,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::AprendizId.eq(aprendiz_id))
            .filter(Column::FichaId.eq(ficha_id))
            .filter(Column::Fecha.eq(fecha))
            .one(db)
            .await
    }

    /// Attendance status for one aprendiz on a date, if a record exists.
    pub async fn estado_for(
        db: &DatabaseConnection,
        aprendiz_id: i64,
        ficha_id: i64,
        fecha: NaiveDate,
    ) -> Result<Option<EstadoAsistencia>, DbErr> {
        Ok(Self::find_by_triple(db, aprendiz_id, ficha_id, fecha)
            .await?
            .map(|a| a.estado))
    }

    /// Every attendance row of a ficha for a given date.
    pub async fn for_ficha_fecha(
        db: &DatabaseConnection,
        ficha_id: i64,
        fecha: NaiveDate,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::FichaId.eq(ficha_id))
            .filter(Column::Fecha.eq(fecha))
            .all(db)
            .await
    }
}

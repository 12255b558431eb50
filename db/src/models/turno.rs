use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use sea_orm::{Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use super::asistencia::EstadoAsistencia;
use crate::error::DomainError;

/// Shift ("turno") configuration: one row per named shift mapping a
/// time-of-day range to a late-arrival cutoff. Read on every QR scan to
/// classify presence vs. lateness; written only through `update_all`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "turnos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub nombre: TurnoNombre,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub hora_limite_llegada: NaiveTime,
    pub active: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "turno_nombre_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TurnoNombre {
    #[sea_orm(string_value = "manana")]
    Manana,

    #[sea_orm(string_value = "tarde")]
    Tarde,

    #[sea_orm(string_value = "noche")]
    Noche,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One entry of the admin batch update. Times arrive as `HH:MM:SS` strings
/// and the whole batch is validated before anything is written.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnoUpdate {
    pub nombre: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub hora_limite_llegada: String,
    pub active: bool,
}

fn parse_hora(field: &str, value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .map_err(|_| DomainError::Validation(format!("{field} debe tener formato HH:MM:SS")))
}

impl Model {
    /// The active shift whose [inicio, fin) interval contains `time`, if any.
    pub async fn current_shift(
        db: &DatabaseConnection,
        time: NaiveTime,
    ) -> Result<Option<Self>, DbErr> {
        let turnos = Entity::find()
            .filter(Column::Active.eq(true))
            .all(db)
            .await?;
        Ok(turnos
            .into_iter()
            .find(|t| t.hora_inicio <= time && time < t.hora_fin))
    }

    pub fn is_late(&self, time: NaiveTime) -> bool {
        time > self.hora_limite_llegada
    }

    /// Classifies a scan time as present or late. When no shift covers the
    /// time the scan still counts as present; the fallback is deliberate so
    /// scans outside configured hours are never silently dropped.
    pub async fn classify(
        db: &DatabaseConnection,
        time: NaiveTime,
    ) -> Result<EstadoAsistencia, DbErr> {
        Ok(match Self::current_shift(db, time).await? {
            Some(turno) if turno.is_late(time) => EstadoAsistencia::Tardanza,
            _ => EstadoAsistencia::Presente,
        })
    }

    /// Replaces the whole shift table in one transaction. Any invalid entry
    /// rejects the entire batch before a single row is touched.
    pub async fn update_all(
        db: &DatabaseConnection,
        updates: Vec<TurnoUpdate>,
    ) -> Result<(), DomainError> {
        let mut parsed = Vec::with_capacity(updates.len());
        for u in &updates {
            let nombre = TurnoNombre::from_str(&u.nombre).map_err(|_| {
                DomainError::Validation(format!("Turno desconocido: {}", u.nombre))
            })?;
            let inicio = parse_hora("hora_inicio", &u.hora_inicio)?;
            let fin = parse_hora("hora_fin", &u.hora_fin)?;
            let limite = parse_hora("hora_limite_llegada", &u.hora_limite_llegada)?;

            if !(inicio < limite && limite <= fin) {
                return Err(DomainError::Validation(format!(
                    "Turno {nombre}: se requiere inicio < límite de llegada ≤ fin"
                )));
            }
            parsed.push((nombre, inicio, fin, limite, u.active));
        }

        let txn = db.begin().await?;
        for (nombre, inicio, fin, limite, active) in parsed {
            let row = Entity::find()
                .filter(Column::Nombre.eq(nombre))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("Turno {nombre} no está configurado"))
                })?;

            let mut activo: ActiveModel = row.into();
            activo.hora_inicio = Set(inicio);
            activo.hora_fin = Set(fin);
            activo.hora_limite_llegada = Set(limite);
            activo.active = Set(active);
            activo.update(&txn).await?;
        }
        txn.commit().await?;

        Ok(())
    }

    pub async fn all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        use sea_orm::QueryOrder;

        Entity::find().order_by_asc(Column::HoraInicio).all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn update(nombre: &str, inicio: &str, fin: &str, limite: &str) -> TurnoUpdate {
        TurnoUpdate {
            nombre: nombre.into(),
            hora_inicio: inicio.into(),
            hora_fin: fin.into(),
            hora_limite_llegada: limite.into(),
            active: true,
        }
    }

    #[tokio::test]
    async fn seeded_shifts_classify_scan_times() {
        let db = setup_test_db().await;

        // Defaults seeded by the migration: mañana 06-12 (límite 06:15),
        // tarde 12-18 (12:15), noche 18-23 (18:15).
        assert_eq!(
            Model::classify(&db, t(6, 10)).await.unwrap(),
            EstadoAsistencia::Presente
        );
        assert_eq!(
            Model::classify(&db, t(6, 30)).await.unwrap(),
            EstadoAsistencia::Tardanza
        );
        assert_eq!(
            Model::classify(&db, t(14, 0)).await.unwrap(),
            EstadoAsistencia::Tardanza
        );

        // Outside every shift: defaults to present.
        assert_eq!(
            Model::classify(&db, t(23, 30)).await.unwrap(),
            EstadoAsistencia::Presente
        );
    }

    #[tokio::test]
    async fn current_shift_interval_is_half_open() {
        let db = setup_test_db().await;

        let at_noon = Model::current_shift(&db, t(12, 0)).await.unwrap().unwrap();
        assert_eq!(at_noon.nombre, TurnoNombre::Tarde);

        assert!(Model::current_shift(&db, t(23, 30)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_all_rejects_whole_batch_on_bad_entry() {
        let db = setup_test_db().await;

        let err = Model::update_all(
            &db,
            vec![
                update("manana", "06:00:00", "07:00:00", "05:00:00"), // cutoff before start
                update("tarde", "12:00:00", "18:00:00", "12:15:00"),
            ],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Nothing was written: tarde keeps its seeded start.
        let tarde = Entity::find()
            .filter(Column::Nombre.eq(TurnoNombre::Tarde))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tarde.hora_inicio, t(12, 0));
    }

    #[tokio::test]
    async fn update_all_applies_valid_batch() {
        let db = setup_test_db().await;

        Model::update_all(
            &db,
            vec![update("manana", "07:00:00", "13:00:00", "07:10:00")],
        )
        .await
        .unwrap();

        let manana = Entity::find()
            .filter(Column::Nombre.eq(TurnoNombre::Manana))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(manana.hora_inicio, t(7, 0));
        assert_eq!(manana.hora_limite_llegada, t(7, 10));
    }

    #[tokio::test]
    async fn malformed_time_and_unknown_name_are_rejected() {
        let db = setup_test_db().await;

        let err = Model::update_all(&db, vec![update("manana", "6am", "12:00:00", "06:15:00")])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Model::update_all(
            &db,
            vec![update("madrugada", "01:00:00", "05:00:00", "01:15:00")],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}

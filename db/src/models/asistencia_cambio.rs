use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::asistencia::EstadoAsistencia;

/// Append-only audit trail for attendance status transitions. One row is
/// written for every successful `asistencia::Model::change_status` call,
/// inside the same transaction as the update itself.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "asistencia_cambios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub asistencia_id: i64,
    pub estado_anterior: EstadoAsistencia,
    pub estado_nuevo: EstadoAsistencia,
    pub motivo: String,
    pub cambiado_por: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asistencia::Entity",
        from = "Column::AsistenciaId",
        to = "super::asistencia::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Asistencia,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CambiadoPor",
        to = "super::user::Column::Id"
    )]
    ChangedBy,
}

impl Related<super::asistencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asistencia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn for_asistencia(
        db: &DatabaseConnection,
        asistencia_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        use sea_orm::QueryOrder;

        Entity::find()
            .filter(Column::AsistenciaId.eq(asistencia_id))
            .order_by_asc(Column::ChangedAt)
            .all(db)
            .await
    }
}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel};
use serde::Serialize;

/// A trainee ("aprendiz") enrolled in one or more fichas.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "aprendices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// National identity document number, unique.
    pub documento: String,
    pub nombres: String,
    pub apellidos: String,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asistencia::Entity")]
    Asistencias,
    #[sea_orm(has_many = "super::ficha_aprendiz::Entity")]
    Fichas,
}

impl Related<super::asistencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asistencias.def()
    }
}

impl Related<super::ficha_aprendiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fichas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        documento: &str,
        nombres: &str,
        apellidos: &str,
        email: Option<&str>,
    ) -> Result<Self, DbErr> {
        let mut active = Model {
            id: 0,
            documento: documento.to_owned(),
            nombres: nombres.to_owned(),
            apellidos: apellidos.to_owned(),
            email: email.map(str::to_owned),
            active: true,
            created_at: Utc::now(),
        }
        .into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos)
    }
}

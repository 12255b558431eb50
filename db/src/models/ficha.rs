use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel};
use serde::Serialize;

/// A cohort ("ficha"): a named group of aprendices sharing a program track.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "fichas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Cohort number as printed on enrollment documents, unique.
    pub numero: String,
    pub programa: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asistencia::Entity")]
    Asistencias,
    #[sea_orm(has_many = "super::ficha_aprendiz::Entity")]
    Aprendices,
}

impl Related<super::asistencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asistencias.def()
    }
}

impl Related<super::ficha_aprendiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aprendices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        numero: &str,
        programa: &str,
    ) -> Result<Self, DbErr> {
        let mut active = Model {
            id: 0,
            numero: numero.to_owned(),
            programa: programa.to_owned(),
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

    /// Active members of this ficha, ordered by last name.
    pub async fn members(
        db: &DatabaseConnection,
        ficha_id: i64,
    ) -> Result<Vec<super::aprendiz::Model>, DbErr> {
        use sea_orm::QueryOrder;

        super::ficha_aprendiz::Entity::find()
            .filter(super::ficha_aprendiz::Column::FichaId.eq(ficha_id))
            .find_also_related(super::aprendiz::Entity)
            .order_by_asc(super::aprendiz::Column::Apellidos)
            .all(db)
            .await
            .map(|rows| {
                rows.into_iter()
                    .filter_map(|(_, a)| a)
                    .filter(|a| a.active)
                    .collect()
            })
    }
}

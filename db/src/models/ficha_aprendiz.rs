use sea_orm::entity::prelude::*;
use sea_orm::IntoActiveModel;

/// Membership table linking aprendices to fichas.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "ficha_aprendices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ficha_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub aprendiz_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ficha::Entity",
        from = "Column::FichaId",
        to = "super::ficha::Column::Id"
    )]
    Ficha,
    #[sea_orm(
        belongs_to = "super::aprendiz::Entity",
        from = "Column::AprendizId",
        to = "super::aprendiz::Column::Id"
    )]
    Aprendiz,
}

impl Related<super::ficha::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ficha.def()
    }
}

impl Related<super::aprendiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aprendiz.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn assign(
        db: &DatabaseConnection,
        ficha_id: i64,
        aprendiz_id: i64,
    ) -> Result<Self, DbErr> {
        Model {
            ficha_id,
            aprendiz_id,
        }
        .into_active_model()
        .insert(db)
        .await
    }

    /// Every ficha id the aprendiz belongs to.
    pub async fn fichas_of(db: &DatabaseConnection, aprendiz_id: i64) -> Result<Vec<i64>, DbErr> {
        Entity::find()
            .filter(Column::AprendizId.eq(aprendiz_id))
            .all(db)
            .await
            .map(|rows| rows.into_iter().map(|r| r.ficha_id).collect())
    }
}

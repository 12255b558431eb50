use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel};
use serde::Serialize;
use util::config;

use crate::error::DomainError;

/// Single-use, time-boxed QR token bound to one aprendiz. A token moves from
/// issued to used exactly once; otherwise it expires by time passage, checked
/// lazily at validation. Expired rows are only removed for storage hygiene.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "qr_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub aprendiz_id: i64,
    /// Wire format scanned by the reader: `token|aprendiz_id|iso-date`.
    pub payload: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::aprendiz::Entity",
        from = "Column::AprendizId",
        to = "super::aprendiz::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Aprendiz,
}

impl Related<super::aprendiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aprendiz.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Successful validation: the bound aprendiz and the seconds left on the clock
/// at the moment of consumption.
#[derive(Debug)]
pub struct TokenConsumido {
    pub aprendiz: super::aprendiz::Model,
    pub time_remaining_seconds: i64,
}

impl Model {
    /// Issues a fresh token for an aprendiz. 256 random bits, hex-encoded,
    /// valid for the configured number of minutes.
    pub async fn issue(
        db: &DatabaseConnection,
        aprendiz_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if super::aprendiz::Model::find_by_id(db, aprendiz_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound("Aprendiz no encontrado".into()));
        }

        let mut buf = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut buf);
        let token = hex::encode(buf);

        let payload = format!("{token}|{aprendiz_id}|{}", now.date_naive());
        let expires_at = now + Duration::minutes(config::qr_token_expiry_minutes());

        let mut active = Model {
            id: 0,
            token,
            aprendiz_id,
            payload,
            generated_at: now,
            expires_at,
            used: false,
        }
        .into_active_model();
        active.id = NotSet;
        Ok(active.insert(db).await?)
    }

    /// Validates a scanned payload and consumes the token.
    ///
    /// Check order: token known, not yet used, not expired, embedded aprendiz
    /// matches the bound one. Consumption is a conditional update guarded on
    /// `used = false`, so a second call for the same token always fails with
    /// the already-used error instead of re-succeeding.
    pub async fn consume(
        db: &DatabaseConnection,
        payload: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenConsumido, DomainError> {
        let mut parts = payload.split('|');
        let (Some(token), Some(id_part)) = (parts.next(), parts.next()) else {
            return Err(DomainError::Validation("Código QR malformado".into()));
        };
        let embedded_id: i64 = id_part
            .parse()
            .map_err(|_| DomainError::Validation("Código QR malformado".into()))?;

        let row = Entity::find()
            .filter(Column::Token.eq(token))
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound("Código QR no reconocido".into()))?;

        if row.used {
            return Err(DomainError::Duplicate("El código QR ya fue utilizado".into()));
        }
        if now > row.expires_at {
            return Err(DomainError::WindowExpired("El código QR ha expirado".into()));
        }
        if embedded_id != row.aprendiz_id {
            return Err(DomainError::Validation(
                "El código QR no corresponde al aprendiz".into(),
            ));
        }

        // Atomic single-use consumption: only flips if still unused.
        let res = Entity::update_many()
            .col_expr(Column::Used, Expr::value(true))
            .filter(Column::Id.eq(row.id))
            .filter(Column::Used.eq(false))
            .exec(db)
            .await?;
        if res.rows_affected != 1 {
            return Err(DomainError::Duplicate("El código QR ya fue utilizado".into()));
        }

        let aprendiz = super::aprendiz::Model::find_by_id(db, row.aprendiz_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Aprendiz no encontrado".into()))?;

        Ok(TokenConsumido {
            aprendiz,
            time_remaining_seconds: (row.expires_at - now).num_seconds(),
        })
    }

    /// Deletes tokens past their expiry. Safe to run on any schedule.
    pub async fn purge_expired(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::ExpiresAt.lt(now))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::DomainError;

/// Represents an account in the `users` table: the people who operate the
/// system (admins, coordinators, instructors, porters) and students who can
/// log in to see their own record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed roles; capability checks branch on these instead of string keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "coordinador")]
    Coordinador,

    #[sea_orm(string_value = "instructor")]
    Instructor,

    #[sea_orm(string_value = "portero")]
    Portero,

    #[sea_orm(string_value = "aprendiz")]
    Aprendiz,
}

/// Actions a role may perform. Evaluated once per request from the JWT claims
/// and checked by the route guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RecordAttendance,
    ChangeAttendance,
    RegisterAnomaly,
    IssueQr,
    ScanQr,
    ConfigureShifts,
    ViewReports,
}

impl Role {
    /// Static capability set per role.
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Admin => &[
                RecordAttendance,
                ChangeAttendance,
                RegisterAnomaly,
                IssueQr,
                ScanQr,
                ConfigureShifts,
                ViewReports,
            ],
            Role::Coordinador => &[
                RecordAttendance,
                ChangeAttendance,
                RegisterAnomaly,
                IssueQr,
                ViewReports,
            ],
            Role::Instructor => &[RecordAttendance, ChangeAttendance, RegisterAnomaly, ViewReports],
            Role::Portero => &[ScanQr, IssueQr],
            Role::Aprendiz => &[],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?
            .to_string();

        let now = Utc::now();
        let mut active = Model {
            id: 0,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
        .into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Verifies a username/password pair against the stored argon2 hash.
    ///
    /// Inactive accounts are rejected the same way as bad credentials so the
    /// response does not reveal which of the two failed.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Self, DomainError> {
        let user = Self::find_by_username(db, username)
            .await?
            .filter(|u| u.active)
            .ok_or_else(|| DomainError::Authorization("Credenciales inválidas".into()))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|_| DomainError::Authorization("Credenciales inválidas".into()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| DomainError::Authorization("Credenciales inválidas".into()))?;

        Ok(user)
    }

    pub async fn deactivate(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut active: ActiveModel = self.clone().into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn verify_credentials_accepts_correct_password() {
        let db = setup_test_db().await;
        Model::create(&db, "ana", "ana@sena.edu.co", "secreto123", Role::Instructor)
            .await
            .unwrap();

        let user = Model::verify_credentials(&db, "ana", "secreto123")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Instructor);
    }

    #[tokio::test]
    async fn verify_credentials_rejects_wrong_password_and_inactive() {
        let db = setup_test_db().await;
        let user = Model::create(&db, "luis", "luis@sena.edu.co", "secreto123", Role::Portero)
            .await
            .unwrap();

        assert!(matches!(
            Model::verify_credentials(&db, "luis", "otra").await,
            Err(DomainError::Authorization(_))
        ));

        user.deactivate(&db).await.unwrap();
        assert!(matches!(
            Model::verify_credentials(&db, "luis", "secreto123").await,
            Err(DomainError::Authorization(_))
        ));
    }

    #[test]
    fn capability_sets_follow_roles() {
        assert!(Role::Admin.can(Capability::ConfigureShifts));
        assert!(Role::Portero.can(Capability::ScanQr));
        assert!(!Role::Portero.can(Capability::ConfigureShifts));
        assert!(!Role::Instructor.can(Capability::ScanQr));
        assert!(Role::Aprendiz.capabilities().is_empty());
    }
}

use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608200001_create_users::Migration),
            Box::new(migrations::m202608200002_create_aprendices::Migration),
            Box::new(migrations::m202608200003_create_fichas::Migration),
            Box::new(migrations::m202608200004_create_ficha_aprendices::Migration),
            Box::new(migrations::m202608200005_create_asistencias::Migration),
            Box::new(migrations::m202608200006_create_asistencia_cambios::Migration),
            Box::new(migrations::m202608200007_create_anomalias::Migration),
            Box::new(migrations::m202608200008_create_qr_tokens::Migration),
            Box::new(migrations::m202608200009_create_turnos::Migration),
        ]
    }
}

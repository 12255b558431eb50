use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200006_create_asistencia_cambios"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("asistencia_cambios"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("asistencia_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("estado_anterior")).string().not_null())
                    .col(ColumnDef::new(Alias::new("estado_nuevo")).string().not_null())
                    .col(ColumnDef::new(Alias::new("motivo")).string().not_null())
                    .col(ColumnDef::new(Alias::new("cambiado_por")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("ip")).string())
                    .col(ColumnDef::new(Alias::new("user_agent")).string())
                    .col(ColumnDef::new(Alias::new("changed_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencia_cambios_asistencia")
                            .from(Alias::new("asistencia_cambios"), Alias::new("asistencia_id"))
                            .to(Alias::new("asistencias"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencia_cambios_cambiado_por")
                            .from(Alias::new("asistencia_cambios"), Alias::new("cambiado_por"))
                            .to(Alias::new("users"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("asistencia_cambios")).to_owned())
            .await
    }
}

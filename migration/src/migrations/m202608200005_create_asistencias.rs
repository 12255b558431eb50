use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200005_create_asistencias"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("asistencias"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("aprendiz_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("ficha_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("fecha")).date().not_null())
                    .col(ColumnDef::new(Alias::new("hora")).time().not_null())
                    .col(ColumnDef::new(Alias::new("estado")).string().not_null())
                    .col(ColumnDef::new(Alias::new("observaciones")).string())
                    .col(ColumnDef::new(Alias::new("registrado_por")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencias_aprendiz")
                            .from(Alias::new("asistencias"), Alias::new("aprendiz_id"))
                            .to(Alias::new("aprendices"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencias_ficha")
                            .from(Alias::new("asistencias"), Alias::new("ficha_id"))
                            .to(Alias::new("fichas"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencias_registrado_por")
                            .from(Alias::new("asistencias"), Alias::new("registrado_por"))
                            .to(Alias::new("users"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per aprendiz/ficha/fecha.
        manager
            .create_index(
                Index::create()
                    .name("idx_asistencias_aprendiz_ficha_fecha")
                    .table(Alias::new("asistencias"))
                    .col(Alias::new("aprendiz_id"))
                    .col(Alias::new("ficha_id"))
                    .col(Alias::new("fecha"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("asistencias")).to_owned())
            .await
    }
}

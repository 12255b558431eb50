use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200007_create_anomalias"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("anomalias"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("asistencia_id")).integer())
                    .col(ColumnDef::new(Alias::new("aprendiz_id")).integer())
                    .col(ColumnDef::new(Alias::new("ficha_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("tipo")).string().not_null())
                    .col(ColumnDef::new(Alias::new("descripcion")).string())
                    .col(ColumnDef::new(Alias::new("registrado_por")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("fecha_asistencia")).date().not_null())
                    .col(ColumnDef::new(Alias::new("ip")).string())
                    .col(ColumnDef::new(Alias::new("user_agent")).string())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_anomalias_asistencia")
                            .from(Alias::new("anomalias"), Alias::new("asistencia_id"))
                            .to(Alias::new("asistencias"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_anomalias_aprendiz")
                            .from(Alias::new("anomalias"), Alias::new("aprendiz_id"))
                            .to(Alias::new("aprendices"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_anomalias_ficha")
                            .from(Alias::new("anomalias"), Alias::new("ficha_id"))
                            .to(Alias::new("fichas"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("anomalias")).to_owned())
            .await
    }
}

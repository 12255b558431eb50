use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200004_create_ficha_aprendices"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("ficha_aprendices"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("ficha_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("aprendiz_id")).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("ficha_id"))
                            .col(Alias::new("aprendiz_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ficha_aprendices_ficha")
                            .from(Alias::new("ficha_aprendices"), Alias::new("ficha_id"))
                            .to(Alias::new("fichas"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ficha_aprendices_aprendiz")
                            .from(Alias::new("ficha_aprendices"), Alias::new("aprendiz_id"))
                            .to(Alias::new("aprendices"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("ficha_aprendices")).to_owned())
            .await
    }
}

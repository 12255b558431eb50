use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200009_create_turnos"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("turnos"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("nombre")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("hora_inicio")).time().not_null())
                    .col(ColumnDef::new(Alias::new("hora_fin")).time().not_null())
                    .col(ColumnDef::new(Alias::new("hora_limite_llegada")).time().not_null())
                    .col(ColumnDef::new(Alias::new("active")).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        // Default shift table; editable afterwards through the admin batch update.
        let insert = Query::insert()
            .into_table(Alias::new("turnos"))
            .columns([
                Alias::new("nombre"),
                Alias::new("hora_inicio"),
                Alias::new("hora_fin"),
                Alias::new("hora_limite_llegada"),
                Alias::new("active"),
            ])
            .values_panic(["manana".into(), "06:00:00".into(), "12:00:00".into(), "06:15:00".into(), true.into()])
            .values_panic(["tarde".into(), "12:00:00".into(), "18:00:00".into(), "12:15:00".into(), true.into()])
            .values_panic(["noche".into(), "18:00:00".into(), "23:00:00".into(), "18:15:00".into(), true.into()])
            .to_owned();
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("turnos")).to_owned())
            .await
    }
}

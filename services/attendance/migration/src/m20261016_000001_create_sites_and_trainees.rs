use sea_orm_migration::prelude::*;

/// `sites` and `trainees` belong to entity management; they are created here so
/// a fresh database can run the attendance service on its own.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sites::Name).string().not_null())
                    .col(ColumnDef::new(Sites::AddrLat).double().not_null())
                    .col(ColumnDef::new(Sites::AddrLong).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trainees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trainees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trainees::FirstName).string().not_null())
                    .col(ColumnDef::new(Trainees::LastName).string().not_null())
                    .col(ColumnDef::new(Trainees::HomeLat).double().not_null())
                    .col(ColumnDef::new(Trainees::HomeLong).double().not_null())
                    .col(ColumnDef::new(Trainees::SiteId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Trainees::Table, Trainees::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trainees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sites {
    Table,
    Id,
    Name,
    AddrLat,
    AddrLong,
}

#[derive(Iden)]
enum Trainees {
    Table,
    Id,
    FirstName,
    LastName,
    HomeLat,
    HomeLong,
    SiteId,
}

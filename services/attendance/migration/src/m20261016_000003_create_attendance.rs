use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::TraineeId).integer().not_null())
                    .col(ColumnDef::new(Attendance::CheckInLat).double().not_null())
                    .col(ColumnDef::new(Attendance::CheckInLong).double().not_null())
                    .col(
                        ColumnDef::new(Attendance::CheckInDateTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::CheckOutLat).double())
                    .col(ColumnDef::new(Attendance::CheckOutLong).double())
                    .col(ColumnDef::new(Attendance::CheckOutDateTime).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::TraineeId)
                            .to(Trainees::Table, Trainees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Day-window scans: trainee + check-in time range.
        manager
            .create_index(
                Index::create()
                    .table(Attendance::Table)
                    .col(Attendance::TraineeId)
                    .col(Attendance::CheckInDateTime)
                    .name("idx_attendance_trainee_id_check_in")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    TraineeId,
    CheckInLat,
    CheckInLong,
    CheckInDateTime,
    CheckOutLat,
    CheckOutLong,
    CheckOutDateTime,
}

#[derive(Iden)]
enum Trainees {
    Table,
    Id,
}

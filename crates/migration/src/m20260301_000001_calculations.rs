//! Calculation history.
//!
//! One row per calculator call made with a caller identity. Inputs and
//! results are stored as JSON text so the schema does not follow the shape
//! of each calculator.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Calculations {
    Table,
    Id,
    UserId,
    CalculationType,
    InputData,
    ResultData,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calculations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Calculations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Calculations::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Calculations::CalculationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Calculations::InputData).text().not_null())
                    .col(ColumnDef::new(Calculations::ResultData).text().not_null())
                    .col(
                        ColumnDef::new(Calculations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // History is always read per user, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx-calculations-user_id-created_at")
                    .table(Calculations::Table)
                    .col(Calculations::UserId)
                    .col(Calculations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calculations::Table).to_owned())
            .await
    }
}

//! Financial tips.
//!
//! Editorial articles served read-only by the API. Only published rows are
//! ever listed. `tags` holds a JSON array of strings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum FinancialTips {
    Table,
    Id,
    Title,
    Slug,
    Content,
    Summary,
    Category,
    Tags,
    Author,
    ImageUrl,
    IsPublished,
    ViewsCount,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinancialTips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialTips::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FinancialTips::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(FinancialTips::Slug)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FinancialTips::Content).text().not_null())
                    .col(ColumnDef::new(FinancialTips::Summary).string_len(500).null())
                    .col(ColumnDef::new(FinancialTips::Category).string_len(50).null())
                    .col(ColumnDef::new(FinancialTips::Tags).text().null())
                    .col(ColumnDef::new(FinancialTips::Author).string().null())
                    .col(ColumnDef::new(FinancialTips::ImageUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(FinancialTips::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FinancialTips::ViewsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FinancialTips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTips::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTips::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_tips-is_published-published_at")
                    .table(FinancialTips::Table)
                    .col(FinancialTips::IsPublished)
                    .col(FinancialTips::PublishedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinancialTips::Table).to_owned())
            .await
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Link::ShortCode)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    // Content dedup rides on this constraint; it must be
                    // part of the table definition so every connection's
                    // ON CONFLICT target resolves against it. Soft-deleted
                    // rows keep their slot so a later create resolves to
                    // the original record.
                    .col(
                        ColumnDef::new(Link::OriginalUrl)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Link::CorrelationId).string().null())
                    .col(ColumnDef::new(Link::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Link::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner_id")
                    .table(Link::Table)
                    .col(Link::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_links_owner_id")
                    .table(Link::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Link {
    #[sea_orm(iden = "links")]
    Table,
    ShortCode,
    OriginalUrl,
    CorrelationId,
    OwnerId,
    IsDeleted,
    CreatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index for scrape_jobs: status + started_at drives the reconciler batch query
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_status_started_at")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::Status)
                    .col(ScrapeJobs::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_store_id")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::StoreId)
                    .to_owned(),
            )
            .await?;

        // Unique diff/upsert key for products
        manager
            .create_index(
                Index::create()
                    .name("idx_products_store_id_hash_id")
                    .table(Products::Table)
                    .col(Products::StoreId)
                    .col(Products::HashId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_store_id_status")
                    .table(Products::Table)
                    .col(Products::StoreId)
                    .col(Products::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_changes_store_id_detected_at")
                    .table(ProductChanges::Table)
                    .col(ProductChanges::StoreId)
                    .col(ProductChanges::DetectedAt)
                    .to_owned(),
            )
            .await?;

        // Due-store selection for the monitoring scheduler
        manager
            .create_index(
                Index::create()
                    .name("idx_monitoring_configs_next_check_at")
                    .table(MonitoringConfigs::Table)
                    .col(MonitoringConfigs::Enabled)
                    .col(MonitoringConfigs::NextCheckAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrape_jobs_status_started_at")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_scrape_jobs_store_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_store_id_hash_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_store_id_status")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_product_changes_store_id_detected_at")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_monitoring_configs_next_check_at")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ScrapeJobs {
    Table,
    StoreId,
    Status,
    StartedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    StoreId,
    HashId,
    Status,
}

#[derive(DeriveIden)]
enum ProductChanges {
    Table,
    StoreId,
    DetectedAt,
}

#[derive(DeriveIden)]
enum MonitoringConfigs {
    Table,
    Enabled,
    NextCheckAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create stores table
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stores::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stores::Name).string().not_null())
                    .col(ColumnDef::new(Stores::BaseUrl).string().not_null())
                    .col(ColumnDef::new(Stores::Platform).string().not_null())
                    .col(
                        ColumnDef::new(Stores::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Stores::ProductCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Stores::LastScrapedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Stores::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stores::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Stores::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create scrape_jobs table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeJobs::StoreId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::ScraperType).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::RunId).string())
                    .col(ColumnDef::new(ScrapeJobs::DatasetId).string())
                    .col(
                        ColumnDef::new(ScrapeJobs::FallbackAttempted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::ProductsFound)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::ProductsUpdated)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ScrapeJobs::ErrorMessage).text())
                    .col(ColumnDef::new(ScrapeJobs::MonitoringLogId).uuid())
                    .col(
                        ColumnDef::new(ScrapeJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ScrapeJobs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScrapeJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Products::HashId).string().not_null())
                    .col(ColumnDef::new(Products::Title).string().not_null())
                    .col(ColumnDef::new(Products::Handle).string())
                    .col(ColumnDef::new(Products::Sku).string())
                    .col(ColumnDef::new(Products::Brand).string())
                    .col(ColumnDef::new(Products::Description).text())
                    .col(
                        ColumnDef::new(Products::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Products::OriginalPrice).double())
                    .col(ColumnDef::new(Products::DiscountPercentage).double())
                    .col(ColumnDef::new(Products::Currency).string())
                    .col(
                        ColumnDef::new(Products::InStock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::ImageUrl).string())
                    .col(ColumnDef::new(Products::ProductUrl).string())
                    .col(ColumnDef::new(Products::Variants).json())
                    .col(ColumnDef::new(Products::Media).json())
                    .col(ColumnDef::new(Products::Options).json())
                    .col(ColumnDef::new(Products::SourceRetailer).string())
                    .col(ColumnDef::new(Products::SourceLanguage).string())
                    .col(ColumnDef::new(Products::SourceCreatedAt).string())
                    .col(ColumnDef::new(Products::SourceUpdatedAt).string())
                    .col(
                        ColumnDef::new(Products::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Products::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::OnSlider)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create product_changes table (append-only audit)
        manager
            .create_table(
                Table::create()
                    .table(ProductChanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductChanges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductChanges::StoreId).uuid().not_null())
                    .col(ColumnDef::new(ProductChanges::HashId).string().not_null())
                    .col(
                        ColumnDef::new(ProductChanges::ChangeType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductChanges::FieldChanged).string())
                    .col(ColumnDef::new(ProductChanges::OldValue).text())
                    .col(ColumnDef::new(ProductChanges::NewValue).text())
                    .col(ColumnDef::new(ProductChanges::ProductTitle).string())
                    .col(ColumnDef::new(ProductChanges::ProductImage).string())
                    .col(
                        ColumnDef::new(ProductChanges::DetectedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create monitoring_configs table
        manager
            .create_table(
                Table::create()
                    .table(MonitoringConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoringConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonitoringConfigs::StoreId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MonitoringConfigs::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MonitoringConfigs::CheckIntervalHours)
                            .integer()
                            .not_null()
                            .default(24),
                    )
                    .col(ColumnDef::new(MonitoringConfigs::LastCheckAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MonitoringConfigs::NextCheckAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MonitoringConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create monitoring_logs table
        manager
            .create_table(
                Table::create()
                    .table(MonitoringLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoringLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitoringLogs::StoreId).uuid().not_null())
                    .col(ColumnDef::new(MonitoringLogs::Status).string().not_null())
                    .col(
                        ColumnDef::new(MonitoringLogs::NewProducts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonitoringLogs::UpdatedProducts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonitoringLogs::RemovedProducts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MonitoringLogs::ErrorMessage).text())
                    .col(
                        ColumnDef::new(MonitoringLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(MonitoringLogs::CompletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitoringLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonitoringConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductChanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScrapeJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stores {
    Table,
    Id,
    Name,
    BaseUrl,
    Platform,
    Status,
    ProductCount,
    LastScrapedAt,
    Deleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScrapeJobs {
    Table,
    Id,
    StoreId,
    Status,
    ScraperType,
    RunId,
    DatasetId,
    FallbackAttempted,
    ProductsFound,
    ProductsUpdated,
    ErrorMessage,
    MonitoringLogId,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    StoreId,
    HashId,
    Title,
    Handle,
    Sku,
    Brand,
    Description,
    Price,
    OriginalPrice,
    DiscountPercentage,
    Currency,
    InStock,
    ImageUrl,
    ProductUrl,
    Variants,
    Media,
    Options,
    SourceRetailer,
    SourceLanguage,
    SourceCreatedAt,
    SourceUpdatedAt,
    Status,
    Published,
    Featured,
    OnSlider,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductChanges {
    Table,
    Id,
    StoreId,
    HashId,
    ChangeType,
    FieldChanged,
    OldValue,
    NewValue,
    ProductTitle,
    ProductImage,
    DetectedAt,
}

#[derive(DeriveIden)]
enum MonitoringConfigs {
    Table,
    Id,
    StoreId,
    Enabled,
    CheckIntervalHours,
    LastCheckAt,
    NextCheckAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MonitoringLogs {
    Table,
    Id,
    StoreId,
    Status,
    NewProducts,
    UpdatedProducts,
    RemovedProducts,
    ErrorMessage,
    StartedAt,
    CompletedAt,
}

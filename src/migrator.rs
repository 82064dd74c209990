use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_products_table::Migration)]
    }
}

mod m20240101_000001_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    fn products_table() -> TableCreateStatement {
        Table::create()
            .table(Products::Table)
            .if_not_exists()
            .col(ColumnDef::new(Products::Id).text().not_null().primary_key())
            .col(ColumnDef::new(Products::Name).string().not_null())
            .col(ColumnDef::new(Products::Price).big_integer().not_null())
            .col(
                ColumnDef::new(Products::Stock)
                    .integer()
                    .not_null()
                    .default(0),
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
            .col(
                ColumnDef::new(Products::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(products_table()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_products_deleted_at")
                        .table(Products::Table)
                        .col(Products::DeletedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Price,
        Stock,
        CreatedAt,
        UpdatedAt,
        DeletedAt,
    }

}

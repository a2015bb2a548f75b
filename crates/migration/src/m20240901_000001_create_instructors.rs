//! Create `instructors` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(pk_auto(Instructors::Id))
                    .col(string_len(Instructors::Name, 120).not_null())
                    .col(ColumnDef::new(Instructors::Specialty).string_len(120).null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Instructors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Instructors { Table, Id, Name, Specialty }

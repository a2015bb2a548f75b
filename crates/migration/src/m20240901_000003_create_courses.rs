//! Create `courses` table with FK to `instructors`.
//!
//! Removing an instructor removes its courses.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_auto(Courses::Id))
                    .col(string_len(Courses::Title, 150).not_null())
                    .col(integer(Courses::Duration).not_null())
                    .col(string_len(Courses::Level, 20).not_null().default("beginner"))
                    .col(integer(Courses::InstructorId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_instructor")
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Courses::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Courses { Table, Id, Title, Duration, Level, InstructorId }

#[derive(DeriveIden)]
enum Instructors { Table, Id }

//! Create `enrollments` join table between `students` and `courses`.
//!
//! Carries the grade and enrollment timestamp; both FKs cascade on delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(pk_auto(Enrollments::Id))
                    .col(integer(Enrollments::StudentId).not_null())
                    .col(integer(Enrollments::CourseId).not_null())
                    .col(ColumnDef::new(Enrollments::Grade).double().null())
                    .col(timestamp_with_time_zone(Enrollments::EnrolledAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_course")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enrollments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enrollments { Table, Id, StudentId, CourseId, Grade, EnrolledAt }

#[derive(DeriveIden)]
enum Students { Table, Id }

#[derive(DeriveIden)]
enum Courses { Table, Id }

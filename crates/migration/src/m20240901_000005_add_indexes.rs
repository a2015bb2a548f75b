use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enrollments: a student enrolls at most once per course
        manager
            .create_index(
                Index::create()
                    .name("uq_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Enrollments: course detail lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        // Courses: filter by instructor
        manager
            .create_index(
                Index::create()
                    .name("idx_course_instructor")
                    .table(Courses::Table)
                    .col(Courses::InstructorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_student_course").table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_enrollment_course").table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_course_instructor").table(Courses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Enrollments { Table, StudentId, CourseId }

#[derive(DeriveIden)]
enum Courses { Table, InstructorId }

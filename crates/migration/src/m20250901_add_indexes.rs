use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Natural keys
        manager
            .create_index(
                Index::create()
                    .name("idx_sections_name_unique")
                    .table(Sections::Table)
                    .col(Sections::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_email_unique")
                    .table(Students::Table)
                    .col(Students::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_materials_code_unique")
                    .table(Materials::Table)
                    .col(Materials::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // At most one enrollment and one grade record per student, material and term
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_material_term_unique")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::MaterialId)
                    .col(Enrollments::Semester)
                    .col(Enrollments::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grade_records_student_material_term_unique")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::StudentId)
                    .col(GradeRecords::MaterialId)
                    .col(GradeRecords::Semester)
                    .col(GradeRecords::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One direct prerequisite row per material
        manager
            .create_index(
                Index::create()
                    .name("idx_material_prerequisites_material_unique")
                    .table(MaterialPrerequisites::Table)
                    .col(MaterialPrerequisites::MaterialId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // No double booking of a group in a slot
        manager
            .create_index(
                Index::create()
                    .name("idx_lectures_material_group_day_time_unique")
                    .table(Lectures::Table)
                    .col(Lectures::MaterialId)
                    .col(Lectures::Group)
                    .col(Lectures::Day)
                    .col(Lectures::Time)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Foreign key lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_students_section_id")
                    .table(Students::Table)
                    .col(Students::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grade_records_student_term")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::StudentId)
                    .col(GradeRecords::Semester)
                    .col(GradeRecords::Year)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lectures_group")
                    .table(Lectures::Table)
                    .col(Lectures::Group)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_lectures_group")
                    .table(Lectures::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_grade_records_student_term")
                    .table(GradeRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_section_id")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_lectures_material_group_day_time_unique")
                    .table(Lectures::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_material_prerequisites_material_unique")
                    .table(MaterialPrerequisites::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_grade_records_student_material_term_unique")
                    .table(GradeRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_student_material_term_unique")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_materials_code_unique")
                    .table(Materials::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_email_unique")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sections_name_unique")
                    .table(Sections::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Sections {
    Table,
    Name,
}

#[derive(Iden)]
enum Students {
    Table,
    SectionId,
    Email,
}

#[derive(Iden)]
enum Materials {
    Table,
    Code,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    MaterialId,
    Semester,
    Year,
}

#[derive(Iden)]
enum GradeRecords {
    Table,
    StudentId,
    MaterialId,
    Semester,
    Year,
}

#[derive(Iden)]
enum MaterialPrerequisites {
    Table,
    MaterialId,
}

#[derive(Iden)]
enum Lectures {
    Table,
    MaterialId,
    Group,
    Day,
    Time,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sections use staff-assigned keys, so no auto increment
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sections::Name).string().not_null())
                    .col(
                        ColumnDef::new(Sections::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::SectionId).integer().not_null())
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .col(ColumnDef::new(Students::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Students::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-section_id")
                            .from(Students::Table, Students::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create materials table
        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Materials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Materials::Code).string().not_null())
                    .col(ColumnDef::new(Materials::Name).string().not_null())
                    .col(ColumnDef::new(Materials::Hours).integer().not_null())
                    .col(ColumnDef::new(Materials::SectionId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-materials-section_id")
                            .from(Materials::Table, Materials::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table ("material downloads")
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::MaterialId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::Semester).string().not_null())
                    .col(ColumnDef::new(Enrollments::Year).integer().not_null())
                    .col(ColumnDef::new(Enrollments::Grade).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-material_id")
                            .from(Enrollments::Table, Enrollments::MaterialId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grade_records table
        manager
            .create_table(
                Table::create()
                    .table(GradeRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeRecords::MaterialId).integer().not_null())
                    .col(ColumnDef::new(GradeRecords::Semester).string().not_null())
                    .col(ColumnDef::new(GradeRecords::Year).integer().not_null())
                    .col(ColumnDef::new(GradeRecords::Grade).double())
                    .col(
                        ColumnDef::new(GradeRecords::SemesterGpa)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::CumulativeGpa)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grade_records-student_id")
                            .from(GradeRecords::Table, GradeRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grade_records-material_id")
                            .from(GradeRecords::Table, GradeRecords::MaterialId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create material_prerequisites table, a null prerequisite means "none required"
        manager
            .create_table(
                Table::create()
                    .table(MaterialPrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaterialPrerequisites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaterialPrerequisites::MaterialId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaterialPrerequisites::PrerequisiteId).integer())
                    .check(
                        Expr::col(MaterialPrerequisites::MaterialId)
                            .ne(Expr::col(MaterialPrerequisites::PrerequisiteId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-material_prerequisites-material_id")
                            .from(
                                MaterialPrerequisites::Table,
                                MaterialPrerequisites::MaterialId,
                            )
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-material_prerequisites-prerequisite_id")
                            .from(
                                MaterialPrerequisites::Table,
                                MaterialPrerequisites::PrerequisiteId,
                            )
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lectures table
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lectures::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lectures::MaterialId).integer().not_null())
                    .col(ColumnDef::new(Lectures::Group).string().not_null())
                    .col(ColumnDef::new(Lectures::Room).string().not_null())
                    .col(ColumnDef::new(Lectures::Day).small_integer().not_null())
                    .col(ColumnDef::new(Lectures::Time).small_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lectures-material_id")
                            .from(Lectures::Table, Lectures::MaterialId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MaterialPrerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GradeRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Sections {
    Table,
    Id,
    Name,
    Active,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    SectionId,
    Email,
    PasswordHash,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum Materials {
    Table,
    Id,
    Code,
    Name,
    Hours,
    SectionId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    MaterialId,
    Semester,
    Year,
    Grade,
}

#[derive(Iden)]
enum GradeRecords {
    Table,
    Id,
    StudentId,
    MaterialId,
    Semester,
    Year,
    Grade,
    SemesterGpa,
    CumulativeGpa,
}

#[derive(Iden)]
enum MaterialPrerequisites {
    Table,
    Id,
    MaterialId,
    PrerequisiteId,
}

#[derive(Iden)]
enum Lectures {
    Table,
    Id,
    MaterialId,
    Group,
    Room,
    Day,
    Time,
}

use crate::{
    entities::{grade_records, materials, students},
    error::{ServiceError, Validator},
};
use log::{debug, info};
use models::{filter::NumericFilter, gpa::average};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};

/// A final grade for one student, material and term
#[derive(Debug, Clone)]
pub struct GradeEntry {
    pub student_id: i64,
    pub material_id: i32,
    pub semester: String,
    pub year: i32,
    pub grade: Option<f64>,
}

pub struct GradeService;

impl GradeService {
    /// Inserts or updates the grade record, then recomputes the semester and
    /// cumulative averages on every record of the student.
    ///
    /// Both averages are unweighted means of the recorded grades, unlike the
    /// credit-weighted GPA shown on the student detail.
    pub async fn record_grade(
        db: &DatabaseConnection,
        entry: GradeEntry,
    ) -> Result<grade_records::Model, ServiceError> {
        let mut v = Validator::new();
        let semester = v.required("semester", &entry.semester);
        if entry.year <= 0 {
            v.add("year", "Year must be a positive number");
        }
        if let Some(grade) = entry.grade
            && !(0.0..=100.0).contains(&grade)
        {
            v.add("grade", "Grade must be between 0 and 100");
        }
        v.finish()?;

        let txn = db.begin().await?;

        students::Entity::find_by_id(entry.student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", entry.student_id))?;
        materials::Entity::find_by_id(entry.material_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Material", entry.material_id))?;

        let existing = grade_records::Entity::find()
            .filter(grade_records::Column::StudentId.eq(entry.student_id))
            .filter(grade_records::Column::MaterialId.eq(entry.material_id))
            .filter(grade_records::Column::Semester.eq(semester.as_str()))
            .filter(grade_records::Column::Year.eq(entry.year))
            .one(&txn)
            .await?;

        let record_id = match existing {
            Some(record) => {
                let id = record.id;
                let mut active: grade_records::ActiveModel = record.into();
                active.grade = Set(entry.grade);
                active.update(&txn).await?;
                id
            }
            None => {
                grade_records::ActiveModel {
                    student_id: Set(entry.student_id),
                    material_id: Set(entry.material_id),
                    semester: Set(semester.clone()),
                    year: Set(entry.year),
                    grade: Set(entry.grade),
                    semester_gpa: Set(0.0),
                    cumulative_gpa: Set(0.0),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
                .id
            }
        };

        Self::recompute(&txn, entry.student_id, &semester, entry.year).await?;

        let record = grade_records::Entity::find_by_id(record_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grade record", record_id))?;

        txn.commit().await?;

        info!(
            "Recorded grade {:?} for student {} in material {} ({} {})",
            record.grade, record.student_id, record.material_id, record.semester, record.year
        );
        Ok(record)
    }

    /// Refreshes the derived averages of a student after a grade write
    pub async fn recompute<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        semester: &str,
        year: i32,
    ) -> Result<(f64, f64), ServiceError> {
        let records = grade_records::Entity::find()
            .filter(grade_records::Column::StudentId.eq(student_id))
            .all(conn)
            .await?;

        let semester_gpa = average(
            records
                .iter()
                .filter(|r| r.semester == semester && r.year == year)
                .map(|r| r.grade),
        );
        let cumulative_gpa = average(records.iter().map(|r| r.grade));

        grade_records::Entity::update_many()
            .col_expr(grade_records::Column::SemesterGpa, Expr::value(semester_gpa))
            .filter(grade_records::Column::StudentId.eq(student_id))
            .filter(grade_records::Column::Semester.eq(semester))
            .filter(grade_records::Column::Year.eq(year))
            .exec(conn)
            .await?;

        grade_records::Entity::update_many()
            .col_expr(
                grade_records::Column::CumulativeGpa,
                Expr::value(cumulative_gpa),
            )
            .filter(grade_records::Column::StudentId.eq(student_id))
            .exec(conn)
            .await?;

        debug!(
            "Student {student_id}: semester {semester}/{year} average {semester_gpa}, cumulative {cumulative_gpa}"
        );
        Ok((semester_gpa, cumulative_gpa))
    }

    pub async fn list(
        db: &DatabaseConnection,
        student_id: NumericFilter<i64>,
    ) -> Result<Vec<grade_records::Model>, ServiceError> {
        let mut query = grade_records::Entity::find();
        match student_id {
            NumericFilter::Unmatchable => return Ok(vec![]),
            NumericFilter::Exact(student_id) => {
                query = query.filter(grade_records::Column::StudentId.eq(student_id));
            }
            NumericFilter::Any => {}
        }

        Ok(query
            .order_by_asc(grade_records::Column::StudentId)
            .order_by_asc(grade_records::Column::Year)
            .order_by_asc(grade_records::Column::Semester)
            .order_by_asc(grade_records::Column::MaterialId)
            .all(db)
            .await?)
    }
}

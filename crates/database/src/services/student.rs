use crate::{
    credentials::hash_password,
    entities::{enrollments, grade_records, materials, sections, students},
    error::{FieldErrors, ServiceError, Validator},
    services::contains_ci,
};
use chrono::Utc;
use log::{info, warn};
use models::{
    filter::NumericFilter,
    gpa::{CreditedGrade, WeightedGpa},
    term::Term,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Form fields carrying enrollment grades are named `grade_<enrollmentId>`
pub const GRADE_FIELD_PREFIX: &str = "grade_";

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub id: i64,
    pub name: String,
    pub section_id: Option<i32>,
    pub email: String,
    pub password: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub section_id: Option<i32>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct StudentFilter {
    pub id: NumericFilter<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: NumericFilter<i32>,
    pub active: Option<bool>,
}

impl Default for StudentFilter {
    fn default() -> Self {
        Self {
            id: NumericFilter::Any,
            name: None,
            email: None,
            section: NumericFilter::Any,
            active: None,
        }
    }
}

/// Unweighted averages as stored on the student's grade records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedAverage {
    pub terms: Vec<TermAverage>,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermAverage {
    pub semester: String,
    pub year: i32,
    pub average: f64,
}

#[derive(Debug, Clone)]
pub struct StudentDetail {
    pub student: students::Model,
    pub section: Option<sections::Model>,
    pub enrollments: Vec<(enrollments::Model, materials::Model)>,
    /// Credit-hour weighted, computed from enrollments on every read
    pub weighted_gpa: WeightedGpa,
    /// Plain average maintained on grade records when grades are recorded
    pub recorded_average: RecordedAverage,
}

/// Result of applying a grade form: what was written and what was rejected
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeFormOutcome {
    pub updated: Vec<i32>,
    pub errors: FieldErrors,
}

pub struct StudentService;

impl StudentService {
    pub async fn list(
        db: &DatabaseConnection,
        filter: &StudentFilter,
    ) -> Result<Vec<students::Model>, ServiceError> {
        if filter.id.is_unmatchable() || filter.section.is_unmatchable() {
            return Ok(vec![]);
        }

        let mut condition = Condition::all();

        if let NumericFilter::Exact(id) = filter.id {
            condition = condition.add(students::Column::Id.eq(id));
        }

        if let NumericFilter::Exact(section) = filter.section {
            condition = condition.add(students::Column::SectionId.eq(section));
        }

        if let Some(name) = &filter.name {
            condition = condition.add(contains_ci(students::Column::Name, name));
        }

        if let Some(email) = &filter.email {
            condition = condition.add(contains_ci(students::Column::Email, email));
        }

        if let Some(active) = filter.active {
            condition = condition.add(students::Column::Active.eq(active));
        }

        Ok(students::Entity::find()
            .filter(condition)
            .order_by_desc(students::Column::CreatedAt)
            .order_by_desc(students::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn get<C: ConnectionTrait>(
        conn: &C,
        id: i64,
    ) -> Result<students::Model, ServiceError> {
        students::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewStudent,
    ) -> Result<students::Model, ServiceError> {
        let mut v = Validator::new();
        let name = v.required("name", &input.name);
        let email = v.required("email", &input.email);
        if input.password.is_empty() {
            v.add("password", "This field is required");
        }
        if input.id <= 0 {
            v.add("id", "Student id must be a positive number");
        } else if students::Entity::find_by_id(input.id).one(db).await?.is_some() {
            v.add("id", "A student with this id already exists");
        }
        match input.section_id {
            None => v.add("section", "This field is required"),
            Some(section_id) => Self::check_section(db, &mut v, section_id).await?,
        }
        if !v.has("email") {
            Self::check_email(db, &mut v, &email, None).await?;
        }
        v.finish()?;

        let student = students::ActiveModel {
            id: Set(input.id),
            name: Set(name),
            section_id: Set(input.section_id.unwrap_or_default()),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            active: Set(input.active),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Student already exists"))?;

        info!("Created student {} in section {}", student.id, student.section_id);
        Ok(student)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        changes: StudentChanges,
    ) -> Result<students::Model, ServiceError> {
        let existing = Self::get(db, id).await?;

        let mut v = Validator::new();
        let name = changes.name.as_deref().map(|name| v.required("name", name));
        let email = changes.email.as_deref().map(|email| v.required("email", email));
        if let Some(email) = &email
            && !v.has("email")
        {
            Self::check_email(db, &mut v, email, Some(id)).await?;
        }
        if let Some(section_id) = changes.section_id {
            Self::check_section(db, &mut v, section_id).await?;
        }
        if changes.password.as_deref() == Some("") {
            v.add("password", "Password cannot be empty");
        }
        v.finish()?;

        let mut active: students::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(section_id) = changes.section_id {
            active.section_id = Set(section_id);
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(hash_password(&password)?);
        }

        let student = if active.is_changed() {
            active
                .update(db)
                .await
                .map_err(|e| ServiceError::conflict_on_unique(e, "Email already in use"))?
        } else {
            Self::get(db, id).await?
        };

        info!("Updated student {id}");
        Ok(student)
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let result = students::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Student", id));
        }

        info!("Deleted student {id}");
        Ok(())
    }

    /// Student with section, enrollments and both GPA figures
    pub async fn detail(db: &DatabaseConnection, id: i64) -> Result<StudentDetail, ServiceError> {
        let student = Self::get(db, id).await?;

        let section = sections::Entity::find_by_id(student.section_id)
            .one(db)
            .await?;

        let enrollments: Vec<(enrollments::Model, materials::Model)> = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(id))
            .find_also_related(materials::Entity)
            .order_by_asc(enrollments::Column::Year)
            .order_by_asc(enrollments::Column::Semester)
            .order_by_asc(enrollments::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(enrollment, material)| material.map(|m| (enrollment, m)))
            .collect();

        let credited: Vec<CreditedGrade> = enrollments
            .iter()
            .map(|(enrollment, material)| CreditedGrade {
                term: Term::new(enrollment.semester.clone(), enrollment.year),
                hours: material.hours,
                grade: enrollment.grade,
            })
            .collect();
        let weighted_gpa = WeightedGpa::from_grades(&credited);

        let records = grade_records::Entity::find()
            .filter(grade_records::Column::StudentId.eq(id))
            .all(db)
            .await?;
        let recorded_average = Self::recorded_average(&records);

        Ok(StudentDetail {
            student,
            section,
            enrollments,
            weighted_gpa,
            recorded_average,
        })
    }

    fn recorded_average(records: &[grade_records::Model]) -> RecordedAverage {
        let terms: BTreeMap<(i32, String), f64> = records
            .iter()
            .map(|r| ((r.year, r.semester.clone()), r.semester_gpa))
            .collect();

        RecordedAverage {
            terms: terms
                .into_iter()
                .map(|((year, semester), average)| TermAverage {
                    semester,
                    year,
                    average,
                })
                .collect(),
            cumulative: records.first().map(|r| r.cumulative_gpa).unwrap_or(0.0),
        }
    }

    /// Applies `grade_<enrollmentId>` form fields to the student's enrollments.
    ///
    /// Each field stands alone: bad fields are reported, good ones are written.
    /// A blank value clears the grade.
    pub async fn apply_grade_form(
        db: &DatabaseConnection,
        student_id: i64,
        fields: &HashMap<String, String>,
    ) -> Result<GradeFormOutcome, ServiceError> {
        Self::get(db, student_id).await?;

        let owned: HashMap<i32, enrollments::Model> = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .all(db)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut outcome = GradeFormOutcome::default();
        let mut keys: Vec<&String> = fields
            .keys()
            .filter(|k| k.starts_with(GRADE_FIELD_PREFIX))
            .collect();
        keys.sort();

        for key in keys {
            let raw = fields[key].trim();

            let Some(enrollment) = key[GRADE_FIELD_PREFIX.len()..]
                .parse::<i32>()
                .ok()
                .and_then(|id| owned.get(&id))
            else {
                warn!("Ignoring grade field {key} for student {student_id}");
                outcome
                    .errors
                    .insert(key.clone(), "Unknown enrollment".to_string());
                continue;
            };

            let grade = if raw.is_empty() {
                None
            } else {
                match raw.parse::<f64>() {
                    Ok(grade) if (0.0..=100.0).contains(&grade) => Some(grade),
                    _ => {
                        outcome.errors.insert(
                            key.clone(),
                            "Grade must be a number between 0 and 100".to_string(),
                        );
                        continue;
                    }
                }
            };

            if enrollment.grade != grade {
                let mut active: enrollments::ActiveModel = enrollment.clone().into();
                active.grade = Set(grade);
                active.update(db).await?;
            }
            outcome.updated.push(enrollment.id);
        }

        info!(
            "Applied {} grade(s) for student {student_id}, {} rejected",
            outcome.updated.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }

    async fn check_section<C: ConnectionTrait>(
        conn: &C,
        v: &mut Validator,
        section_id: i32,
    ) -> Result<(), ServiceError> {
        if sections::Entity::find_by_id(section_id)
            .one(conn)
            .await?
            .is_none()
        {
            v.add("section", format!("Section {section_id} does not exist"));
        }
        Ok(())
    }

    async fn check_email<C: ConnectionTrait>(
        conn: &C,
        v: &mut Validator,
        email: &str,
        except: Option<i64>,
    ) -> Result<(), ServiceError> {
        let mut query = students::Entity::find().filter(students::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(students::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            v.add("email", "A student with this email already exists");
        }
        Ok(())
    }
}

use crate::{
    entities::{enrollments, materials, students},
    error::ServiceError,
    services::prerequisite::PrerequisiteService,
};
use chrono::NaiveDate;
use log::info;
use models::{
    filter::NumericFilter,
    policy::{PassMark, PrerequisitePolicy},
    term::Term,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;

/// How registration treats prerequisites
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegistrationRules {
    pub policy: PrerequisitePolicy,
    pub pass_mark: PassMark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrationOutcome {
    pub term: Option<Term>,
    pub created: Vec<enrollments::Model>,
    /// Already registered for the same material in the same month
    pub existing: Vec<enrollments::Model>,
}

#[derive(Debug, Clone)]
pub struct EnrollmentFilter {
    pub student_id: NumericFilter<i64>,
    pub material_id: NumericFilter<i32>,
    pub semester: Option<String>,
    pub year: NumericFilter<i32>,
}

impl Default for EnrollmentFilter {
    fn default() -> Self {
        Self {
            student_id: NumericFilter::Any,
            material_id: NumericFilter::Any,
            semester: None,
            year: NumericFilter::Any,
        }
    }
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Registers ("downloads") materials for a student in the calendar month of `as_of`.
    ///
    /// A material already registered for that month is reported, not duplicated.
    pub async fn register(
        db: &DatabaseConnection,
        student_id: i64,
        material_ids: &[i32],
        as_of: NaiveDate,
        rules: RegistrationRules,
    ) -> Result<RegistrationOutcome, ServiceError> {
        let term = Term::of_month(as_of);

        let mut wanted: Vec<i32> = Vec::with_capacity(material_ids.len());
        for id in material_ids {
            if !wanted.contains(id) {
                wanted.push(*id);
            }
        }

        let txn = db.begin().await?;

        students::Entity::find_by_id(student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", student_id))?;

        let found: HashMap<i32, materials::Model> = materials::Entity::find()
            .filter(materials::Column::Id.is_in(wanted.clone()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        if let Some(missing) = wanted.iter().find(|id| !found.contains_key(id)) {
            return Err(ServiceError::not_found("Material", missing));
        }

        if rules.policy == PrerequisitePolicy::Enforce {
            Self::check_prerequisites(&txn, student_id, &wanted, &found, rules.pass_mark).await?;
        }

        let mut outcome = RegistrationOutcome {
            term: Some(term.clone()),
            ..Default::default()
        };

        for material_id in wanted {
            let existing = enrollments::Entity::find()
                .filter(enrollments::Column::StudentId.eq(student_id))
                .filter(enrollments::Column::MaterialId.eq(material_id))
                .filter(enrollments::Column::Semester.eq(term.semester.as_str()))
                .filter(enrollments::Column::Year.eq(term.year))
                .one(&txn)
                .await?;

            match existing {
                Some(enrollment) => outcome.existing.push(enrollment),
                None => {
                    let enrollment = enrollments::ActiveModel {
                        student_id: Set(student_id),
                        material_id: Set(material_id),
                        semester: Set(term.semester.clone()),
                        year: Set(term.year),
                        grade: Set(None),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        ServiceError::conflict_on_unique(
                            e,
                            format!("Material {material_id} is already registered for {term}"),
                        )
                    })?;
                    outcome.created.push(enrollment);
                }
            }
        }

        txn.commit().await?;

        info!(
            "Student {student_id} registered {} material(s) for {term}, {} already present",
            outcome.created.len(),
            outcome.existing.len()
        );
        Ok(outcome)
    }

    /// Refuses the registration when any material's prerequisite lacks a passing grade
    async fn check_prerequisites<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        wanted: &[i32],
        found: &HashMap<i32, materials::Model>,
        pass_mark: PassMark,
    ) -> Result<(), ServiceError> {
        let mut missing = Vec::new();

        for material_id in wanted {
            let Some(prerequisite_id) =
                PrerequisiteService::prerequisite_of(conn, *material_id).await?
            else {
                continue;
            };

            let passed = enrollments::Entity::find()
                .filter(enrollments::Column::StudentId.eq(student_id))
                .filter(enrollments::Column::MaterialId.eq(prerequisite_id))
                .all(conn)
                .await?
                .iter()
                .any(|e| pass_mark.passes(e.grade));

            if !passed {
                let prerequisite = materials::Entity::find_by_id(prerequisite_id)
                    .one(conn)
                    .await?
                    .map(|m| m.code)
                    .unwrap_or_else(|| prerequisite_id.to_string());
                let code = found
                    .get(material_id)
                    .map(|m| m.code.clone())
                    .unwrap_or_else(|| material_id.to_string());
                missing.push(format!("{code} requires {prerequisite}"));
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "Prerequisites not passed: {}",
                missing.join(", ")
            )))
        }
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: &EnrollmentFilter,
    ) -> Result<Vec<enrollments::Model>, ServiceError> {
        if filter.student_id.is_unmatchable()
            || filter.material_id.is_unmatchable()
            || filter.year.is_unmatchable()
        {
            return Ok(vec![]);
        }

        let mut query = enrollments::Entity::find();

        if let NumericFilter::Exact(student_id) = filter.student_id {
            query = query.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let NumericFilter::Exact(material_id) = filter.material_id {
            query = query.filter(enrollments::Column::MaterialId.eq(material_id));
        }
        if let Some(semester) = &filter.semester {
            query = query.filter(enrollments::Column::Semester.eq(semester.as_str()));
        }
        if let NumericFilter::Exact(year) = filter.year {
            query = query.filter(enrollments::Column::Year.eq(year));
        }

        Ok(query.order_by_asc(enrollments::Column::Id).all(db).await?)
    }

    pub async fn remove(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = enrollments::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Enrollment", id));
        }

        info!("Removed enrollment {id}");
        Ok(())
    }
}

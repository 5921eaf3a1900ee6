use crate::{
    entities::{enrollments, grade_records, lectures, material_prerequisites, materials, sections},
    error::{ServiceError, Validator},
    services::{contains_ci, grade::GradeService},
};
use log::info;
use models::filter::NumericFilter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::BTreeSet;

/// Submitted material form, used for both create and edit
#[derive(Debug, Clone, Default)]
pub struct MaterialInput {
    pub code: String,
    pub name: String,
    pub hours: Option<i32>,
    pub section_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct MaterialFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub hours: NumericFilter<i32>,
    pub section: NumericFilter<i32>,
}

impl Default for MaterialFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            hours: NumericFilter::Any,
            section: NumericFilter::Any,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialDetail {
    pub material: materials::Model,
    pub prerequisite: Option<materials::Model>,
    pub lectures: Vec<lectures::Model>,
    pub enrollment_count: u64,
}

pub struct MaterialService;

impl MaterialService {
    pub async fn list(
        db: &DatabaseConnection,
        filter: &MaterialFilter,
    ) -> Result<Vec<materials::Model>, ServiceError> {
        if filter.hours.is_unmatchable() || filter.section.is_unmatchable() {
            return Ok(vec![]);
        }

        let mut condition = Condition::all();

        if let Some(code) = &filter.code {
            condition = condition.add(contains_ci(materials::Column::Code, code));
        }

        if let Some(name) = &filter.name {
            condition = condition.add(contains_ci(materials::Column::Name, name));
        }

        if let NumericFilter::Exact(hours) = filter.hours {
            condition = condition.add(materials::Column::Hours.eq(hours));
        }

        if let NumericFilter::Exact(section) = filter.section {
            condition = condition.add(materials::Column::SectionId.eq(section));
        }

        Ok(materials::Entity::find()
            .filter(condition)
            .order_by_asc(materials::Column::Code)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<materials::Model, ServiceError> {
        materials::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Material", id))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: MaterialInput,
    ) -> Result<materials::Model, ServiceError> {
        let (code, name, hours) = Self::validate(db, &input, None).await?;

        let material = materials::ActiveModel {
            code: Set(code),
            name: Set(name),
            hours: Set(hours),
            section_id: Set(input.section_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Material code already exists"))?;

        info!("Created material {} ({})", material.code, material.id);
        Ok(material)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: MaterialInput,
    ) -> Result<materials::Model, ServiceError> {
        let existing = Self::get(db, id).await?;
        let (code, name, hours) = Self::validate(db, &input, Some(id)).await?;

        let mut active: materials::ActiveModel = existing.into();
        active.code = Set(code);
        active.name = Set(name);
        active.hours = Set(hours);
        active.section_id = Set(input.section_id);

        let material = active
            .update(db)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Material code already exists"))?;

        info!("Updated material {}", material.id);
        Ok(material)
    }

    /// Deletes a material along with its grade records, then refreshes the
    /// averages of every student term that lost a record
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        let terms: BTreeSet<(i64, String, i32)> = grade_records::Entity::find()
            .filter(grade_records::Column::MaterialId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|record| (record.student_id, record.semester, record.year))
            .collect();

        let result = materials::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Material", id));
        }

        for (student_id, semester, year) in &terms {
            GradeService::recompute(&txn, *student_id, semester, *year).await?;
        }

        txn.commit().await?;
        info!("Deleted material {id}, refreshed {} student term(s)", terms.len());
        Ok(())
    }

    pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<MaterialDetail, ServiceError> {
        let material = Self::get(db, id).await?;

        let prerequisite = match material_prerequisites::Entity::find()
            .filter(material_prerequisites::Column::MaterialId.eq(id))
            .one(db)
            .await?
            .and_then(|row| row.prerequisite_id)
        {
            Some(prerequisite_id) => materials::Entity::find_by_id(prerequisite_id).one(db).await?,
            None => None,
        };

        let lectures = lectures::Entity::find()
            .filter(lectures::Column::MaterialId.eq(id))
            .order_by_asc(lectures::Column::Day)
            .order_by_asc(lectures::Column::Time)
            .all(db)
            .await?;

        let enrollment_count = enrollments::Entity::find()
            .filter(enrollments::Column::MaterialId.eq(id))
            .count(db)
            .await?;

        Ok(MaterialDetail {
            material,
            prerequisite,
            lectures,
            enrollment_count,
        })
    }

    /// Collects every field problem before anything is written
    async fn validate(
        db: &DatabaseConnection,
        input: &MaterialInput,
        except: Option<i32>,
    ) -> Result<(String, String, i32), ServiceError> {
        let mut v = Validator::new();
        let code = v.required("code", &input.code);
        let name = v.required("name", &input.name);

        let hours = match input.hours {
            None => {
                v.add("hours", "This field is required");
                0
            }
            Some(hours) if hours <= 0 => {
                v.add("hours", "Hours must be greater than zero");
                hours
            }
            Some(hours) => hours,
        };

        if !v.has("code") {
            let mut query = materials::Entity::find().filter(materials::Column::Code.eq(code.as_str()));
            if let Some(id) = except {
                query = query.filter(materials::Column::Id.ne(id));
            }
            if query.one(db).await?.is_some() {
                v.add("code", "A material with this code already exists");
            }
        }

        if let Some(section_id) = input.section_id
            && sections::Entity::find_by_id(section_id).one(db).await?.is_none()
        {
            v.add("section", format!("Section {section_id} does not exist"));
        }

        v.finish()?;
        Ok((code, name, hours))
    }
}

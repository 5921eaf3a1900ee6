use crate::{
    entities::{enrollments, grade_records, lectures, materials, sections, students},
    error::ServiceError,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

/// Headline counts for the staff dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sections: u64,
    pub active_sections: u64,
    pub students: u64,
    pub active_students: u64,
    pub materials: u64,
    pub enrollments: u64,
    pub grade_records: u64,
    pub lectures: u64,
}

pub struct ReportService;

impl ReportService {
    pub async fn summary(db: &DatabaseConnection) -> Result<Summary, ServiceError> {
        Ok(Summary {
            sections: sections::Entity::find().count(db).await?,
            active_sections: sections::Entity::find()
                .filter(sections::Column::Active.eq(true))
                .count(db)
                .await?,
            students: students::Entity::find().count(db).await?,
            active_students: students::Entity::find()
                .filter(students::Column::Active.eq(true))
                .count(db)
                .await?,
            materials: materials::Entity::find().count(db).await?,
            enrollments: enrollments::Entity::find().count(db).await?,
            grade_records: grade_records::Entity::find().count(db).await?,
            lectures: lectures::Entity::find().count(db).await?,
        })
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Final grade for a student, material and term, plus the averages derived from it
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i64,
    pub material_id: i32,
    pub semester: String,
    pub year: i32,
    pub grade: Option<f64>,
    pub semester_gpa: f64,
    pub cumulative_gpa: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::materials::Entity",
        from = "Column::MaterialId",
        to = "super::materials::Column::Id"
    )]
    Material,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use database::{entities::grade_records, services::grade::GradeEntry};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeRecordResponse {
    pub id: i32,
    pub student_id: i64,
    pub material_id: i32,
    pub semester: String,
    pub year: i32,
    pub grade: Option<f64>,
    /// Unweighted mean of the student's grades in this term
    pub semester_gpa: f64,
    /// Unweighted mean of all the student's grades
    pub cumulative_gpa: f64,
}

impl From<grade_records::Model> for GradeRecordResponse {
    fn from(record: grade_records::Model) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            material_id: record.material_id,
            semester: record.semester,
            year: record.year,
            grade: record.grade,
            semester_gpa: record.semester_gpa,
            cumulative_gpa: record.cumulative_gpa,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GradeQueryParams {
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordGradeRequest {
    pub student_id: i64,
    pub material_id: i32,
    pub semester: String,
    pub year: i32,
    pub grade: Option<f64>,
}

impl From<RecordGradeRequest> for GradeEntry {
    fn from(request: RecordGradeRequest) -> Self {
        Self {
            student_id: request.student_id,
            material_id: request.material_id,
            semester: request.semester,
            year: request.year,
            grade: request.grade,
        }
    }
}

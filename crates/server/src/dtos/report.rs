use database::services::report::Summary;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub sections: u64,
    pub active_sections: u64,
    pub students: u64,
    pub active_students: u64,
    pub materials: u64,
    pub enrollments: u64,
    pub grade_records: u64,
    pub lectures: u64,
}

impl From<Summary> for DashboardResponse {
    fn from(summary: Summary) -> Self {
        Self {
            sections: summary.sections,
            active_sections: summary.active_sections,
            students: summary.students,
            active_students: summary.active_students,
            materials: summary.materials,
            enrollments: summary.enrollments,
            grade_records: summary.grade_records,
            lectures: summary.lectures,
        }
    }
}

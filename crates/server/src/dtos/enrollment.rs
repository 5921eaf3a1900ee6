use database::{
    entities::enrollments,
    services::enrollment::{EnrollmentFilter, RegistrationOutcome},
};
use models::filter::NumericFilter;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub student_id: i64,
    pub material_id: i32,
    pub semester: String,
    pub year: i32,
    pub grade: Option<f64>,
}

impl From<enrollments::Model> for EnrollmentResponse {
    fn from(enrollment: enrollments::Model) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            material_id: enrollment.material_id,
            semester: enrollment.semester,
            year: enrollment.year,
            grade: enrollment.grade,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EnrollmentQueryParams {
    pub student_id: Option<String>,
    pub material_id: Option<String>,
    pub semester: Option<String>,
    pub year: Option<String>,
}

impl From<EnrollmentQueryParams> for EnrollmentFilter {
    fn from(params: EnrollmentQueryParams) -> Self {
        Self {
            student_id: NumericFilter::parse(params.student_id.as_deref()),
            material_id: NumericFilter::parse(params.material_id.as_deref()),
            semester: params.semester.filter(|s| !s.trim().is_empty()),
            year: NumericFilter::parse(params.year.as_deref()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    /// Term the registration landed in, as `{month}/{year}`
    pub semester: Option<String>,
    pub year: Option<i32>,
    pub created: Vec<EnrollmentResponse>,
    /// Materials already registered in that month
    pub existing: Vec<EnrollmentResponse>,
}

impl From<RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            semester: outcome.term.as_ref().map(|term| term.semester.clone()),
            year: outcome.term.map(|term| term.year),
            created: outcome.created.into_iter().map(Into::into).collect(),
            existing: outcome.existing.into_iter().map(Into::into).collect(),
        }
    }
}

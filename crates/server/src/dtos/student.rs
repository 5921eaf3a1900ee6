use super::{default_true, enrollment::EnrollmentResponse, section::SectionResponse};
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::students,
    services::student::{
        GradeFormOutcome, NewStudent, RecordedAverage, StudentChanges, StudentDetail,
        StudentFilter,
    },
};
use models::{
    filter::{NumericFilter, flag_filter, text_filter},
    gpa::WeightedGpa,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// A student as returned by the API; the credential hash is never included
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub section_id: i32,
    pub email: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<students::Model> for StudentResponse {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id,
            name: student.name,
            section_id: student.section_id,
            email: student.email,
            active: student.active,
            created_at: student.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StudentQueryParams {
    pub id_student: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub active: Option<String>,
}

impl From<StudentQueryParams> for StudentFilter {
    fn from(params: StudentQueryParams) -> Self {
        Self {
            id: NumericFilter::parse(params.id_student.as_deref()),
            name: text_filter(params.name.as_deref()),
            email: text_filter(params.email.as_deref()),
            section: NumericFilter::parse(params.section.as_deref()),
            active: flag_filter(params.active.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub id: i64,
    pub name: String,
    pub section_id: Option<i32>,
    pub email: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<CreateStudentRequest> for NewStudent {
    fn from(request: CreateStudentRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            section_id: request.section_id,
            email: request.email,
            password: request.password,
            active: request.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub section_id: Option<i32>,
    pub email: Option<String>,
    /// Replaces the credential when present
    pub password: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateStudentRequest> for StudentChanges {
    fn from(request: UpdateStudentRequest) -> Self {
        Self {
            name: request.name,
            section_id: request.section_id,
            email: request.email,
            password: request.password,
            active: request.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentEnrollmentResponse {
    #[serde(flatten)]
    pub enrollment: EnrollmentResponse,
    pub material_code: String,
    pub material_name: String,
    pub hours: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TermGpaResponse {
    pub semester: String,
    pub year: i32,
    pub gpa: f64,
    pub hours: i64,
}

/// Credit-hour weighted GPA computed from enrollments
#[derive(Debug, Serialize, ToSchema)]
pub struct WeightedGpaResponse {
    pub terms: Vec<TermGpaResponse>,
    pub cumulative: f64,
    pub hours: i64,
}

impl From<WeightedGpa> for WeightedGpaResponse {
    fn from(gpa: WeightedGpa) -> Self {
        Self {
            terms: gpa
                .terms
                .into_iter()
                .map(|term| TermGpaResponse {
                    semester: term.semester,
                    year: term.year,
                    gpa: term.gpa,
                    hours: term.hours,
                })
                .collect(),
            cumulative: gpa.cumulative,
            hours: gpa.hours,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TermAverageResponse {
    pub semester: String,
    pub year: i32,
    pub average: f64,
}

/// Unweighted averages stored on grade records
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordedAverageResponse {
    pub terms: Vec<TermAverageResponse>,
    pub cumulative: f64,
}

impl From<RecordedAverage> for RecordedAverageResponse {
    fn from(average: RecordedAverage) -> Self {
        Self {
            terms: average
                .terms
                .into_iter()
                .map(|term| TermAverageResponse {
                    semester: term.semester,
                    year: term.year,
                    average: term.average,
                })
                .collect(),
            cumulative: average.cumulative,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetailResponse {
    pub student: StudentResponse,
    pub section: Option<SectionResponse>,
    pub enrollments: Vec<StudentEnrollmentResponse>,
    pub weighted_gpa: WeightedGpaResponse,
    pub recorded_average: RecordedAverageResponse,
}

impl From<StudentDetail> for StudentDetailResponse {
    fn from(detail: StudentDetail) -> Self {
        Self {
            student: detail.student.into(),
            section: detail.section.map(Into::into),
            enrollments: detail
                .enrollments
                .into_iter()
                .map(|(enrollment, material)| StudentEnrollmentResponse {
                    enrollment: enrollment.into(),
                    material_code: material.code,
                    material_name: material.name,
                    hours: material.hours,
                })
                .collect(),
            weighted_gpa: detail.weighted_gpa.into(),
            recorded_average: detail.recorded_average.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeFormResponse {
    /// Enrollments whose grade was written
    pub updated: Vec<i32>,
    /// Rejected form fields, keyed by field name
    pub errors: BTreeMap<String, String>,
}

impl From<GradeFormOutcome> for GradeFormResponse {
    fn from(outcome: GradeFormOutcome) -> Self {
        Self {
            updated: outcome.updated,
            errors: outcome.errors,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterMaterialsRequest {
    pub material_ids: Vec<i32>,
    /// Date whose calendar month names the term; defaults to today
    pub as_of: Option<NaiveDate>,
}

use crate::{
    dtos::{
        enrollment::{EnrollmentResponse, RegistrationResponse},
        grade::{GradeRecordResponse, RecordGradeRequest},
        material::{LectureResponse, MaterialDetailResponse, MaterialRequest, MaterialResponse},
        prerequisite::{
            AppliedPrerequisiteResponse, AssignPrerequisitesRequest, AssignPrerequisitesResponse,
            PrerequisiteAssignmentRequest, PrerequisiteResponse, SkippedPrerequisiteResponse,
        },
        report::DashboardResponse,
        section::{CreateSectionRequest, SectionResponse, UpdateSectionRequest},
        student::{
            CreateStudentRequest, GradeFormResponse, RecordedAverageResponse,
            RegisterMaterialsRequest, StudentDetailResponse, StudentEnrollmentResponse,
            StudentResponse, TermAverageResponse, TermGpaResponse, UpdateStudentRequest,
            WeightedGpaResponse,
        },
        timetable::{
            LectureEntryResponse, PlaceLectureRequest, PlaceLectureResponse, TimetableDayResponse,
            TimetableResponse,
        },
    },
    error::ErrorResponse,
    routes::{
        dashboard, enrollment, grade, health, material, prerequisite, root, section, student,
        timetable,
    },
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        section::list_sections,
        section::create_section,
        section::update_section,
        section::delete_section,
        student::list_students,
        student::create_student,
        student::get_student,
        student::update_student,
        student::delete_student,
        student::apply_grades,
        student::register_materials,
        material::list_materials,
        material::create_material,
        material::get_material,
        material::update_material,
        material::delete_material,
        grade::list_grades,
        grade::record_grade,
        enrollment::list_enrollments,
        enrollment::remove_enrollment,
        prerequisite::list_prerequisites,
        prerequisite::assign_prerequisites,
        timetable::get_timetable,
        timetable::place_lecture,
        timetable::remove_lecture,
        dashboard::dashboard
    ),
    components(schemas(
        ErrorResponse,
        SectionResponse,
        CreateSectionRequest,
        UpdateSectionRequest,
        StudentResponse,
        CreateStudentRequest,
        UpdateStudentRequest,
        StudentDetailResponse,
        StudentEnrollmentResponse,
        WeightedGpaResponse,
        TermGpaResponse,
        RecordedAverageResponse,
        TermAverageResponse,
        GradeFormResponse,
        RegisterMaterialsRequest,
        RegistrationResponse,
        EnrollmentResponse,
        MaterialResponse,
        MaterialRequest,
        MaterialDetailResponse,
        LectureResponse,
        GradeRecordResponse,
        RecordGradeRequest,
        PrerequisiteAssignmentRequest,
        AssignPrerequisitesRequest,
        AssignPrerequisitesResponse,
        AppliedPrerequisiteResponse,
        SkippedPrerequisiteResponse,
        PrerequisiteResponse,
        PlaceLectureRequest,
        PlaceLectureResponse,
        LectureEntryResponse,
        TimetableDayResponse,
        TimetableResponse,
        DashboardResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Sections", description = "Academic sections"),
        (name = "Students", description = "Students, their grades and detail view"),
        (name = "Materials", description = "Course materials and credit hours"),
        (name = "Grades", description = "Recorded grades and unweighted averages"),
        (name = "Enrollments", description = "Material registrations (downloads)"),
        (name = "Prerequisites", description = "One direct prerequisite per material"),
        (name = "Timetable", description = "Weekly lecture grid"),
        (name = "Dashboard", description = "Record counts"),
    ),
    info(
        title = "Records API",
        version = "1.0.0",
        description = "Staff API for sections, students, materials, grades and the lecture timetable",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

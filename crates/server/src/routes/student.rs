use crate::{
    dtos::{
        enrollment::RegistrationResponse,
        student::{
            CreateStudentRequest, GradeFormResponse, RegisterMaterialsRequest,
            StudentDetailResponse, StudentQueryParams, StudentResponse, UpdateStudentRequest,
        },
    },
    error::{ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Local;
use database::services::{enrollment::EnrollmentService, student::StudentService};
use std::collections::HashMap;

/// List students, newest first
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Matching students", body = Vec<StudentResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not staff")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentQueryParams>,
) -> ApiResult<Json<Vec<StudentResponse>>> {
    let students = StudentService::list(&state.db, &params.into()).await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<StudentResponse>)> {
    let student = StudentService::create(&state.db, request.into()).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

/// Student with section, enrollments and both GPA figures
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student found", body = StudentDetailResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StudentDetailResponse>> {
    let detail = StudentService::detail(&state.db, id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStudentRequest>,
) -> ApiResult<Json<StudentResponse>> {
    let student = StudentService::update(&state.db, id, request.into()).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    StudentService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply `grade_<enrollmentId>` form fields to the student's enrollments
#[utoipa::path(
    post,
    path = "/students/{id}/grades",
    params(("id" = i64, Path, description = "Student id")),
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "Fields named grade_<enrollmentId>; an empty value clears the grade"
    ),
    responses(
        (status = 200, description = "Valid fields applied, rejected ones listed", body = GradeFormResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn apply_grades(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(fields): Form<HashMap<String, String>>,
) -> ApiResult<Json<GradeFormResponse>> {
    let outcome = StudentService::apply_grade_form(&state.db, id, &fields).await?;
    Ok(Json(outcome.into()))
}

/// Register ("download") materials for the student in the current month
#[utoipa::path(
    post,
    path = "/students/{id}/downloads",
    params(("id" = i64, Path, description = "Student id")),
    request_body = RegisterMaterialsRequest,
    responses(
        (status = 200, description = "Registration result", body = RegistrationResponse),
        (status = 403, description = "A prerequisite has not been passed", body = ErrorResponse),
        (status = 404, description = "Student or material not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn register_materials(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RegisterMaterialsRequest>,
) -> ApiResult<Json<RegistrationResponse>> {
    let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());
    let outcome =
        EnrollmentService::register(&state.db, id, &request.material_ids, as_of, state.rules)
            .await?;
    Ok(Json(outcome.into()))
}

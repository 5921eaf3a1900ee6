use crate::{
    dtos::grade::{GradeQueryParams, GradeRecordResponse, RecordGradeRequest},
    error::{ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use database::services::grade::GradeService;
use models::filter::NumericFilter;

#[utoipa::path(
    get,
    path = "/grades",
    params(GradeQueryParams),
    responses(
        (status = 200, description = "Grade records with their derived averages", body = Vec<GradeRecordResponse>)
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn list_grades(
    State(state): State<AppState>,
    Query(params): Query<GradeQueryParams>,
) -> ApiResult<Json<Vec<GradeRecordResponse>>> {
    let student_id = NumericFilter::parse(params.student_id.as_deref());
    let records = GradeService::list(&state.db, student_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Record a final grade and refresh the student's semester and cumulative averages
#[utoipa::path(
    post,
    path = "/grades",
    request_body = RecordGradeRequest,
    responses(
        (status = 200, description = "Grade recorded", body = GradeRecordResponse),
        (status = 404, description = "Student or material not found", body = ErrorResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn record_grade(
    State(state): State<AppState>,
    Json(request): Json<RecordGradeRequest>,
) -> ApiResult<Json<GradeRecordResponse>> {
    let record = GradeService::record_grade(&state.db, request.into()).await?;
    Ok(Json(record.into()))
}

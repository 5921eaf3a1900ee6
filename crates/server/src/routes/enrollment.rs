use crate::{
    dtos::enrollment::{EnrollmentQueryParams, EnrollmentResponse},
    error::{ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::enrollment::EnrollmentService;

#[utoipa::path(
    get,
    path = "/downloads",
    params(EnrollmentQueryParams),
    responses(
        (status = 200, description = "Matching enrollments", body = Vec<EnrollmentResponse>)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<EnrollmentQueryParams>,
) -> ApiResult<Json<Vec<EnrollmentResponse>>> {
    let enrollments = EnrollmentService::list(&state.db, &params.into()).await?;
    Ok(Json(enrollments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    delete,
    path = "/downloads/{id}",
    params(("id" = i32, Path, description = "Enrollment id")),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn remove_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    EnrollmentService::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

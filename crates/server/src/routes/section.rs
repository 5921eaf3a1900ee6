use crate::{
    dtos::section::{
        CreateSectionRequest, SectionQueryParams, SectionResponse, UpdateSectionRequest,
    },
    error::{ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::section::SectionService;

/// List sections matching the optional filters
#[utoipa::path(
    get,
    path = "/sections",
    params(SectionQueryParams),
    responses(
        (status = 200, description = "Sections ordered by id", body = Vec<SectionResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not staff")
    ),
    security(("jwt" = [])),
    tag = "Sections"
)]
pub async fn list_sections(
    State(state): State<AppState>,
    Query(params): Query<SectionQueryParams>,
) -> ApiResult<Json<Vec<SectionResponse>>> {
    let sections = SectionService::list(&state.db, &params.into()).await?;
    Ok(Json(sections.into_iter().map(Into::into).collect()))
}

/// Create a section with a staff-assigned id
#[utoipa::path(
    post,
    path = "/sections",
    request_body = CreateSectionRequest,
    responses(
        (status = 201, description = "Section created", body = SectionResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Sections"
)]
pub async fn create_section(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionRequest>,
) -> ApiResult<(StatusCode, Json<SectionResponse>)> {
    let section = SectionService::create(&state.db, request.into()).await?;
    Ok((StatusCode::CREATED, Json(section.into())))
}

/// Edit a section; supplying a different id rekeys it along with its students
#[utoipa::path(
    put,
    path = "/sections/{id}",
    params(("id" = i32, Path, description = "Section id")),
    request_body = UpdateSectionRequest,
    responses(
        (status = 200, description = "Section updated", body = SectionResponse),
        (status = 404, description = "Section not found", body = ErrorResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Sections"
)]
pub async fn update_section(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSectionRequest>,
) -> ApiResult<Json<SectionResponse>> {
    let section = SectionService::update(&state.db, id, request.into()).await?;
    Ok(Json(section.into()))
}

/// Delete a section and every student in it
#[utoipa::path(
    delete,
    path = "/sections/{id}",
    params(("id" = i32, Path, description = "Section id")),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 404, description = "Section not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Sections"
)]
pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    SectionService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

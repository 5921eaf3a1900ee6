use crate::{
    dtos::material::{
        MaterialDetailResponse, MaterialQueryParams, MaterialRequest, MaterialResponse,
    },
    error::{ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::material::MaterialService;

/// List materials ordered by code
#[utoipa::path(
    get,
    path = "/materials",
    params(MaterialQueryParams),
    responses(
        (status = 200, description = "Matching materials", body = Vec<MaterialResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not staff")
    ),
    security(("jwt" = [])),
    tag = "Materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(params): Query<MaterialQueryParams>,
) -> ApiResult<Json<Vec<MaterialResponse>>> {
    let materials = MaterialService::list(&state.db, &params.into()).await?;
    Ok(Json(materials.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/materials",
    request_body = MaterialRequest,
    responses(
        (status = 201, description = "Material created", body = MaterialResponse),
        (status = 422, description = "Invalid fields, nothing saved", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    Json(request): Json<MaterialRequest>,
) -> ApiResult<(StatusCode, Json<MaterialResponse>)> {
    let material = MaterialService::create(&state.db, request.into()).await?;
    Ok((StatusCode::CREATED, Json(material.into())))
}

/// Material with its prerequisite, lectures and enrollment count
#[utoipa::path(
    get,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material found", body = MaterialDetailResponse),
        (status = 404, description = "Material not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MaterialDetailResponse>> {
    let detail = MaterialService::detail(&state.db, id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    put,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    request_body = MaterialRequest,
    responses(
        (status = 200, description = "Material updated", body = MaterialResponse),
        (status = 404, description = "Material not found", body = ErrorResponse),
        (status = 422, description = "Invalid fields, nothing saved", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<MaterialRequest>,
) -> ApiResult<Json<MaterialResponse>> {
    let material = MaterialService::update(&state.db, id, request.into()).await?;
    Ok(Json(material.into()))
}

#[utoipa::path(
    delete,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 204, description = "Material deleted"),
        (status = 404, description = "Material not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    MaterialService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

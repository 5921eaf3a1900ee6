use crate::{
    dtos::prerequisite::{
        AssignPrerequisitesRequest, AssignPrerequisitesResponse, PrerequisiteResponse,
    },
    error::ApiResult,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::prerequisite::PrerequisiteService;

/// Every material with its current prerequisite
#[utoipa::path(
    get,
    path = "/prerequisites",
    responses(
        (status = 200, description = "Prerequisite table", body = Vec<PrerequisiteResponse>)
    ),
    security(("jwt" = [])),
    tag = "Prerequisites"
)]
pub async fn list_prerequisites(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PrerequisiteResponse>>> {
    let views = PrerequisiteService::list(&state.db).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Replace prerequisites; pairs that cannot be resolved are reported, not applied
#[utoipa::path(
    post,
    path = "/prerequisites",
    request_body = AssignPrerequisitesRequest,
    responses(
        (status = 200, description = "Applied and skipped pairs", body = AssignPrerequisitesResponse)
    ),
    security(("jwt" = [])),
    tag = "Prerequisites"
)]
pub async fn assign_prerequisites(
    State(state): State<AppState>,
    Json(request): Json<AssignPrerequisitesRequest>,
) -> ApiResult<Json<AssignPrerequisitesResponse>> {
    let outcome = PrerequisiteService::assign(&state.db, request.into()).await?;
    Ok(Json(outcome.into()))
}

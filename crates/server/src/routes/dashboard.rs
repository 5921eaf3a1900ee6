use crate::{dtos::report::DashboardResponse, error::ApiResult, state::AppState};
use axum::{Json, extract::State};
use database::services::report::ReportService;

/// Headline counts for the staff dashboard
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Record counts", body = DashboardResponse)
    ),
    security(("jwt" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardResponse>> {
    let summary = ReportService::summary(&state.db).await?;
    Ok(Json(summary.into()))
}

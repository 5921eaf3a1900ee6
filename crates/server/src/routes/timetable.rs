use crate::{
    dtos::timetable::{
        PlaceLectureRequest, PlaceLectureResponse, TimetableQueryParams, TimetableResponse,
    },
    error::{ApiError, ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use database::{error::ServiceError, services::timetable::TimetableService};

/// The weekly lecture grid, optionally for one group
#[utoipa::path(
    get,
    path = "/timetable",
    params(TimetableQueryParams),
    responses(
        (status = 200, description = "Six days of five slots", body = TimetableResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn get_timetable(
    State(state): State<AppState>,
    Query(params): Query<TimetableQueryParams>,
) -> ApiResult<Json<TimetableResponse>> {
    let group = params.group.as_deref().map(str::trim).filter(|g| !g.is_empty());
    let grid = TimetableService::grid(&state.db, group).await?;
    Ok(Json(grid.into()))
}

/// Book a lecture, or move one when `id` is given
#[utoipa::path(
    post,
    path = "/timetable/lectures",
    request_body = PlaceLectureRequest,
    responses(
        (status = 200, description = "Lecture placed", body = PlaceLectureResponse),
        (status = 400, description = "Body is not valid JSON", body = PlaceLectureResponse),
        (status = 404, description = "Material or lecture not found", body = PlaceLectureResponse),
        (status = 409, description = "Slot already taken by the group", body = PlaceLectureResponse),
        (status = 422, description = "Invalid day, time, group or room", body = PlaceLectureResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn place_lecture(
    State(state): State<AppState>,
    payload: Result<Json<PlaceLectureRequest>, JsonRejection>,
) -> (StatusCode, Json<PlaceLectureResponse>) {
    let placed = match payload {
        Ok(Json(request)) => TimetableService::place_lecture(&state.db, request.into())
            .await
            .map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    match placed {
        Ok(lecture) => (
            StatusCode::OK,
            Json(PlaceLectureResponse {
                success: true,
                id: Some(lecture.id),
                error: None,
            }),
        ),
        Err(err) => {
            err.log();

            let message = match &err {
                ApiError::Service(ServiceError::Validation(fields)) => fields
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("; "),
                other => other.user_message(),
            };

            (
                err.status_code(),
                Json(PlaceLectureResponse {
                    success: false,
                    id: None,
                    error: Some(message),
                }),
            )
        }
    }
}

#[utoipa::path(
    delete,
    path = "/timetable/lectures/{id}",
    params(("id" = i32, Path, description = "Lecture id")),
    responses(
        (status = 204, description = "Lecture removed"),
        (status = 404, description = "Lecture not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn remove_lecture(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    TimetableService::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use database::services::timetable::{LectureEntry, LecturePlacement};
use models::timetable::Grid;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TimetableQueryParams {
    /// Only show lectures of this group
    pub group: Option<String>,
}

/// Lecture edit submitted by the timetable page; a positive `id` edits in place
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceLectureRequest {
    pub id: Option<i32>,
    pub material_id: i32,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub room: String,
    pub day: i16,
    pub time: i16,
}

impl From<PlaceLectureRequest> for LecturePlacement {
    fn from(request: PlaceLectureRequest) -> Self {
        Self {
            id: request.id,
            material_id: request.material_id,
            group: request.group,
            room: request.room,
            day: request.day,
            time: request.time,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceLectureResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LectureEntryResponse {
    pub lecture_id: i32,
    pub material_id: i32,
    pub material_code: String,
    pub material_name: String,
    pub group: String,
    pub room: String,
    /// Hex color shared by every lecture of the material
    pub color: String,
}

impl From<LectureEntry> for LectureEntryResponse {
    fn from(entry: LectureEntry) -> Self {
        Self {
            lecture_id: entry.lecture_id,
            material_id: entry.material_id,
            material_code: entry.material_code,
            material_name: entry.material_name,
            group: entry.group,
            room: entry.room,
            color: entry.color.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimetableDayResponse {
    pub day: i16,
    pub name: String,
    /// One cell per time slot, each holding zero or more lectures
    pub slots: Vec<Vec<LectureEntryResponse>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimetableResponse {
    pub days: Vec<TimetableDayResponse>,
}

impl From<Grid<LectureEntry>> for TimetableResponse {
    fn from(grid: Grid<LectureEntry>) -> Self {
        let days = grid
            .rows()
            .map(|(day, cells)| TimetableDayResponse {
                day: day.number(),
                name: day.name().to_string(),
                slots: cells
                    .iter()
                    .map(|cell| cell.iter().cloned().map(Into::into).collect())
                    .collect(),
            })
            .collect();
        Self { days }
    }
}

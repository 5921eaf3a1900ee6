use database::{
    entities::{lectures, materials},
    services::material::{MaterialDetail, MaterialFilter, MaterialInput},
};
use models::filter::{NumericFilter, text_filter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    /// Credit hours
    pub hours: i32,
    pub section_id: Option<i32>,
}

impl From<materials::Model> for MaterialResponse {
    fn from(material: materials::Model) -> Self {
        Self {
            id: material.id,
            code: material.code,
            name: material.name,
            hours: material.hours,
            section_id: material.section_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MaterialQueryParams {
    pub code: Option<String>,
    pub name: Option<String>,
    pub hours: Option<String>,
    pub section: Option<String>,
}

impl From<MaterialQueryParams> for MaterialFilter {
    fn from(params: MaterialQueryParams) -> Self {
        Self {
            code: text_filter(params.code.as_deref()),
            name: text_filter(params.name.as_deref()),
            hours: NumericFilter::parse(params.hours.as_deref()),
            section: NumericFilter::parse(params.section.as_deref()),
        }
    }
}

/// Body for both create and edit; every field is validated together
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MaterialRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub hours: Option<i32>,
    pub section_id: Option<i32>,
}

impl From<MaterialRequest> for MaterialInput {
    fn from(request: MaterialRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            hours: request.hours,
            section_id: request.section_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LectureResponse {
    pub id: i32,
    pub material_id: i32,
    pub group: String,
    pub room: String,
    /// 1 (Saturday) through 6 (Thursday)
    pub day: i16,
    /// 0 through 4
    pub time: i16,
}

impl From<lectures::Model> for LectureResponse {
    fn from(lecture: lectures::Model) -> Self {
        Self {
            id: lecture.id,
            material_id: lecture.material_id,
            group: lecture.group,
            room: lecture.room,
            day: lecture.day.number(),
            time: lecture.time.number(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialDetailResponse {
    pub material: MaterialResponse,
    pub prerequisite: Option<MaterialResponse>,
    pub lectures: Vec<LectureResponse>,
    pub enrollment_count: u64,
}

impl From<MaterialDetail> for MaterialDetailResponse {
    fn from(detail: MaterialDetail) -> Self {
        Self {
            material: detail.material.into(),
            prerequisite: detail.prerequisite.map(Into::into),
            lectures: detail.lectures.into_iter().map(Into::into).collect(),
            enrollment_count: detail.enrollment_count,
        }
    }
}

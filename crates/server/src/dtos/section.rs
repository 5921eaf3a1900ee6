use super::default_true;
use database::{
    entities::sections,
    services::section::{NewSection, SectionChanges, SectionFilter},
};
use models::filter::{NumericFilter, flag_filter, text_filter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionResponse {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

impl From<sections::Model> for SectionResponse {
    fn from(section: sections::Model) -> Self {
        Self {
            id: section.id,
            name: section.name,
            active: section.active,
        }
    }
}

/// Filters are raw strings so malformed numbers yield an empty list instead of a 400
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SectionQueryParams {
    /// Exact section id
    pub id: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub active: Option<String>,
}

impl From<SectionQueryParams> for SectionFilter {
    fn from(params: SectionQueryParams) -> Self {
        Self {
            id: NumericFilter::parse(params.id.as_deref()),
            name: text_filter(params.name.as_deref()),
            active: flag_filter(params.active.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSectionRequest {
    pub id: i32,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<CreateSectionRequest> for NewSection {
    fn from(request: CreateSectionRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            active: request.active,
        }
    }
}

/// Omitted fields keep their value; a new `id` rekeys the section
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSectionRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateSectionRequest> for SectionChanges {
    fn from(request: UpdateSectionRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            active: request.active,
        }
    }
}

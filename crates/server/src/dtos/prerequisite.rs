use super::material::MaterialResponse;
use database::services::prerequisite::{
    AssignmentOutcome, PrerequisiteAssignment, PrerequisiteView,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PrerequisiteAssignmentRequest {
    pub material_id: i32,
    /// Code or name of the prerequisite; blank or "none" clears it
    #[serde(default)]
    pub prerequisite: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignPrerequisitesRequest {
    pub assignments: Vec<PrerequisiteAssignmentRequest>,
}

impl From<AssignPrerequisitesRequest> for Vec<PrerequisiteAssignment> {
    fn from(request: AssignPrerequisitesRequest) -> Self {
        request
            .assignments
            .into_iter()
            .map(|pair| PrerequisiteAssignment {
                material_id: pair.material_id,
                prerequisite: pair.prerequisite,
            })
            .collect()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedPrerequisiteResponse {
    pub material_id: i32,
    pub prerequisite_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkippedPrerequisiteResponse {
    pub material_id: i32,
    pub prerequisite: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignPrerequisitesResponse {
    pub applied: Vec<AppliedPrerequisiteResponse>,
    pub skipped: Vec<SkippedPrerequisiteResponse>,
}

impl From<AssignmentOutcome> for AssignPrerequisitesResponse {
    fn from(outcome: AssignmentOutcome) -> Self {
        Self {
            applied: outcome
                .applied
                .into_iter()
                .map(|row| AppliedPrerequisiteResponse {
                    material_id: row.material_id,
                    prerequisite_id: row.prerequisite_id,
                })
                .collect(),
            skipped: outcome
                .skipped
                .into_iter()
                .map(|skip| SkippedPrerequisiteResponse {
                    material_id: skip.material_id,
                    prerequisite: skip.prerequisite,
                    reason: skip.reason,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteResponse {
    pub material: MaterialResponse,
    pub prerequisite: Option<MaterialResponse>,
}

impl From<PrerequisiteView> for PrerequisiteResponse {
    fn from(view: PrerequisiteView) -> Self {
        Self {
            material: view.material.into(),
            prerequisite: view.prerequisite.map(Into::into),
        }
    }
}

use crate::{
    entities::{material_prerequisites, materials},
    error::ServiceError,
};
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;

/// One submitted (material, prerequisite name) pair
#[derive(Debug, Clone)]
pub struct PrerequisiteAssignment {
    pub material_id: i32,
    /// Code or name of the prerequisite; blank or "none" clears it
    pub prerequisite: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAssignment {
    pub material_id: i32,
    pub prerequisite: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentOutcome {
    pub applied: Vec<material_prerequisites::Model>,
    pub skipped: Vec<SkippedAssignment>,
}

#[derive(Debug, Clone)]
pub struct PrerequisiteView {
    pub material: materials::Model,
    pub prerequisite: Option<materials::Model>,
}

enum Resolution {
    None,
    Material(i32),
}

pub struct PrerequisiteService;

impl PrerequisiteService {
    /// Replaces the prerequisite of each material with the submitted one.
    ///
    /// A material keeps at most one direct prerequisite, the last write wins.
    /// The current row of every known material is removed before its name is
    /// resolved. A name that does not resolve, or that names the material
    /// itself, is reported in `skipped` and leaves the material with no row.
    /// Pairs naming an unknown material are skipped without any write.
    pub async fn assign(
        db: &DatabaseConnection,
        assignments: Vec<PrerequisiteAssignment>,
    ) -> Result<AssignmentOutcome, ServiceError> {
        let catalog = materials::Entity::find().all(db).await?;
        let by_id: HashMap<i32, &materials::Model> = catalog.iter().map(|m| (m.id, m)).collect();

        let mut outcome = AssignmentOutcome::default();

        for assignment in assignments {
            let skip = |reason: &str| SkippedAssignment {
                material_id: assignment.material_id,
                prerequisite: assignment.prerequisite.clone(),
                reason: reason.to_string(),
            };

            if !by_id.contains_key(&assignment.material_id) {
                warn!("Skipping prerequisite for unknown material {}", assignment.material_id);
                outcome.skipped.push(skip("Unknown material"));
                continue;
            }

            let resolved = match Self::resolve(&catalog, &assignment.prerequisite) {
                Some(Resolution::None) => Ok(None),
                Some(Resolution::Material(id)) if id == assignment.material_id => {
                    warn!(
                        "Clearing prerequisite of material {}, listed as its own prerequisite",
                        assignment.material_id
                    );
                    Err("A material cannot be its own prerequisite")
                }
                Some(Resolution::Material(id)) => Ok(Some(id)),
                None => {
                    warn!(
                        "Clearing prerequisite of material {}, {:?} does not resolve",
                        assignment.material_id, assignment.prerequisite
                    );
                    Err("Unknown prerequisite")
                }
            };

            let txn = db.begin().await?;
            material_prerequisites::Entity::delete_many()
                .filter(material_prerequisites::Column::MaterialId.eq(assignment.material_id))
                .exec(&txn)
                .await?;

            match resolved {
                Ok(prerequisite_id) => {
                    let row = material_prerequisites::ActiveModel {
                        material_id: Set(assignment.material_id),
                        prerequisite_id: Set(prerequisite_id),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                    txn.commit().await?;
                    outcome.applied.push(row);
                }
                Err(reason) => {
                    txn.commit().await?;
                    outcome.skipped.push(skip(reason));
                }
            }
        }

        info!(
            "Assigned {} prerequisite(s), skipped {}",
            outcome.applied.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    /// Resolves a submitted name by material code first, then by name
    fn resolve(catalog: &[materials::Model], raw: &str) -> Option<Resolution> {
        let needle = raw.trim();
        if needle.is_empty() || needle.eq_ignore_ascii_case("none") {
            return Some(Resolution::None);
        }

        catalog
            .iter()
            .find(|m| m.code.eq_ignore_ascii_case(needle))
            .or_else(|| {
                let lowered = needle.to_lowercase();
                catalog.iter().find(|m| m.name.to_lowercase() == lowered)
            })
            .map(|m| Resolution::Material(m.id))
    }

    /// Every material with its current prerequisite, ordered by code
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<PrerequisiteView>, ServiceError> {
        let catalog = materials::Entity::find()
            .order_by_asc(materials::Column::Code)
            .all(db)
            .await?;
        let by_id: HashMap<i32, materials::Model> =
            catalog.iter().map(|m| (m.id, m.clone())).collect();

        let links: HashMap<i32, i32> = material_prerequisites::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .filter_map(|row| row.prerequisite_id.map(|p| (row.material_id, p)))
            .collect();

        Ok(catalog
            .into_iter()
            .map(|material| {
                let prerequisite = links
                    .get(&material.id)
                    .and_then(|id| by_id.get(id))
                    .cloned();
                PrerequisiteView {
                    material,
                    prerequisite,
                }
            })
            .collect())
    }

    /// The direct prerequisite of a material, if one is required
    pub async fn prerequisite_of<C: ConnectionTrait>(
        conn: &C,
        material_id: i32,
    ) -> Result<Option<i32>, ServiceError> {
        Ok(material_prerequisites::Entity::find()
            .filter(material_prerequisites::Column::MaterialId.eq(material_id))
            .one(conn)
            .await?
            .and_then(|row| row.prerequisite_id))
    }
}

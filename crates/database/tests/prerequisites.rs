mod common;

use database::{
    entities::material_prerequisites,
    services::prerequisite::{PrerequisiteAssignment, PrerequisiteService},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn pair(material_id: i32, prerequisite: &str) -> PrerequisiteAssignment {
    PrerequisiteAssignment {
        material_id,
        prerequisite: prerequisite.to_string(),
    }
}

async fn rows_for(
    db: &sea_orm::DatabaseConnection,
    material_id: i32,
) -> Vec<material_prerequisites::Model> {
    material_prerequisites::Entity::find()
        .filter(material_prerequisites::Column::MaterialId.eq(material_id))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn same_pair_twice_leaves_one_row() {
    let db = common::setup().await;
    let basics = common::material(&db, "MATH101", 3).await;
    let advanced = common::material(&db, "MATH201", 3).await;

    PrerequisiteService::assign(&db, vec![pair(advanced.id, "MATH101")])
        .await
        .unwrap();
    PrerequisiteService::assign(&db, vec![pair(advanced.id, "MATH101")])
        .await
        .unwrap();

    let rows = rows_for(&db, advanced.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prerequisite_id, Some(basics.id));
}

#[tokio::test]
async fn last_write_wins_and_none_clears() {
    let db = common::setup().await;
    let basics = common::material(&db, "MATH101", 3).await;
    let stats = common::material(&db, "STAT101", 3).await;
    let advanced = common::material(&db, "MATH201", 3).await;

    // Resolves by name as well as by code
    PrerequisiteService::assign(&db, vec![pair(advanced.id, "stat101 NAME")])
        .await
        .unwrap();
    assert_eq!(rows_for(&db, advanced.id).await[0].prerequisite_id, Some(stats.id));

    PrerequisiteService::assign(&db, vec![pair(advanced.id, "math101")])
        .await
        .unwrap();
    assert_eq!(rows_for(&db, advanced.id).await[0].prerequisite_id, Some(basics.id));

    PrerequisiteService::assign(&db, vec![pair(advanced.id, "None")])
        .await
        .unwrap();
    let rows = rows_for(&db, advanced.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prerequisite_id, None);
}

#[tokio::test]
async fn unresolvable_names_clear_the_current_prerequisite() {
    let db = common::setup().await;
    let basics = common::material(&db, "MATH101", 3).await;
    let advanced = common::material(&db, "MATH201", 3).await;
    let physics = common::material(&db, "PHYS201", 3).await;

    PrerequisiteService::assign(
        &db,
        vec![pair(advanced.id, "MATH101"), pair(physics.id, "MATH101")],
    )
    .await
    .unwrap();

    let outcome = PrerequisiteService::assign(
        &db,
        vec![
            pair(advanced.id, "MATH201"),
            pair(physics.id, "Underwater Basketry"),
            pair(9999, "MATH101"),
        ],
    )
    .await
    .unwrap();

    assert!(outcome.applied.is_empty());
    let reasons: Vec<&str> = outcome.skipped.iter().map(|s| s.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec![
            "A material cannot be its own prerequisite",
            "Unknown prerequisite",
            "Unknown material",
        ]
    );
    assert!(rows_for(&db, advanced.id).await.is_empty());
    assert!(rows_for(&db, physics.id).await.is_empty());
    assert!(rows_for(&db, 9999).await.is_empty());
    assert_eq!(
        PrerequisiteService::prerequisite_of(&db, physics.id).await.unwrap(),
        None
    );
    assert!(rows_for(&db, basics.id).await.is_empty());
}

#[tokio::test]
async fn listing_shows_every_material() {
    let db = common::setup().await;
    let basics = common::material(&db, "MATH101", 3).await;
    let advanced = common::material(&db, "MATH201", 3).await;
    PrerequisiteService::assign(&db, vec![pair(advanced.id, "MATH101")])
        .await
        .unwrap();

    let views = PrerequisiteService::list(&db).await.unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].material.id, basics.id);
    assert!(views[0].prerequisite.is_none());
    assert_eq!(views[1].prerequisite.as_ref().map(|m| m.id), Some(basics.id));
    assert_eq!(
        PrerequisiteService::prerequisite_of(&db, advanced.id).await.unwrap(),
        Some(basics.id)
    );
}

mod common;

use database::{
    entities::grade_records,
    error::ServiceError,
    services::{
        grade::{GradeEntry, GradeService},
        material::MaterialService,
    },
};
use models::filter::NumericFilter;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn entry(student_id: i64, material_id: i32, semester: &str, year: i32, grade: f64) -> GradeEntry {
    GradeEntry {
        student_id,
        material_id,
        semester: semester.to_string(),
        year,
        grade: Some(grade),
    }
}

#[tokio::test]
async fn semester_and_cumulative_averages_follow_every_write() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    let physics = common::material(&db, "PHYS101", 4).await;
    let chemistry = common::material(&db, "CHEM101", 2).await;

    GradeService::record_grade(&db, entry(100, algebra.id, "1", 2024, 80.0))
        .await
        .unwrap();
    let second = GradeService::record_grade(&db, entry(100, physics.id, "1", 2024, 90.0))
        .await
        .unwrap();
    assert_eq!(second.semester_gpa, 85.0);
    assert_eq!(second.cumulative_gpa, 85.0);

    let third = GradeService::record_grade(&db, entry(100, chemistry.id, "2", 2024, 70.0))
        .await
        .unwrap();
    assert_eq!(third.semester_gpa, 70.0);
    assert_eq!(third.cumulative_gpa, 80.0);

    // Earlier rows carry the refreshed cumulative figure and keep their own term average
    let first_term = grade_records::Entity::find()
        .filter(grade_records::Column::StudentId.eq(100i64))
        .filter(grade_records::Column::Semester.eq("1"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(first_term.len(), 2);
    for record in first_term {
        assert_eq!(record.semester_gpa, 85.0);
        assert_eq!(record.cumulative_gpa, 80.0);
    }
}

#[tokio::test]
async fn regrading_updates_in_place() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    let physics = common::material(&db, "PHYS101", 4).await;

    GradeService::record_grade(&db, entry(100, algebra.id, "1", 2024, 80.0))
        .await
        .unwrap();
    GradeService::record_grade(&db, entry(100, physics.id, "1", 2024, 90.0))
        .await
        .unwrap();
    let regraded = GradeService::record_grade(&db, entry(100, algebra.id, "1", 2024, 60.0))
        .await
        .unwrap();

    assert_eq!(regraded.grade, Some(60.0));
    assert_eq!(regraded.semester_gpa, 75.0);
    assert_eq!(GradeService::list(&db, NumericFilter::Exact(100)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_a_material_refreshes_remaining_averages() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    let physics = common::material(&db, "PHYS101", 4).await;

    GradeService::record_grade(&db, entry(100, algebra.id, "1", 2024, 80.0))
        .await
        .unwrap();
    GradeService::record_grade(&db, entry(100, physics.id, "1", 2024, 90.0))
        .await
        .unwrap();

    MaterialService::delete(&db, physics.id).await.unwrap();

    let remaining = GradeService::list(&db, NumericFilter::Exact(100)).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].material_id, algebra.id);
    assert_eq!(remaining[0].semester_gpa, 80.0);
    assert_eq!(remaining[0].cumulative_gpa, 80.0);
}

#[tokio::test]
async fn deleting_an_unknown_material_is_reported() {
    let db = common::setup().await;

    let err = MaterialService::delete(&db, 9999).await.unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Material", .. }));
}

#[tokio::test]
async fn missing_grades_are_ignored_and_default_to_zero() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;

    let record = GradeService::record_grade(
        &db,
        GradeEntry {
            grade: None,
            ..entry(100, algebra.id, "1", 2024, 0.0)
        },
    )
    .await
    .unwrap();

    assert_eq!(record.grade, None);
    assert_eq!(record.semester_gpa, 0.0);
    assert_eq!(record.cumulative_gpa, 0.0);
}

#[tokio::test]
async fn unknown_student_is_reported() {
    let db = common::setup().await;
    let algebra = common::material(&db, "MATH101", 3).await;

    let err = GradeService::record_grade(&db, entry(999, algebra.id, "1", 2024, 80.0))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Student", .. }));
}

#[tokio::test]
async fn out_of_range_grade_is_rejected() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;

    let err = GradeService::record_grade(&db, entry(100, algebra.id, " ", 2024, 140.0))
        .await
        .unwrap_err();

    match err {
        ServiceError::Validation(fields) => {
            assert!(fields.contains_key("grade"));
            assert!(fields.contains_key("semester"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

mod common;

use database::{
    entities::{materials, students},
    error::ServiceError,
    services::{
        material::{MaterialFilter, MaterialInput, MaterialService},
        report::ReportService,
        section::{NewSection, SectionChanges, SectionFilter, SectionService},
        student::{NewStudent, StudentChanges, StudentFilter, StudentService},
    },
};
use models::filter::NumericFilter;
use sea_orm::EntityTrait;
use std::collections::HashMap;

#[tokio::test]
async fn section_validation_collects_every_field() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;

    let err = SectionService::create(
        &db,
        NewSection {
            id: 1,
            name: "Science".to_string(),
            active: true,
        },
    )
    .await
    .unwrap_err();

    match err {
        ServiceError::Validation(fields) => {
            assert!(fields.contains_key("id"));
            assert!(fields.contains_key("name"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn section_filters() {
    let db = common::setup().await;
    common::section(&db, 1, "Natural Science").await;
    common::section(&db, 2, "Literature").await;

    let by_name = SectionService::list(
        &db,
        &SectionFilter {
            name: Some("science".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, 1);

    let malformed = SectionService::list(
        &db,
        &SectionFilter {
            id: NumericFilter::parse(Some("two")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(malformed.is_empty());
}

#[tokio::test]
async fn rekeying_a_section_carries_its_students() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::section(&db, 3, "Arts").await;
    common::student(&db, 100, 1).await;
    let material = common::material(&db, "MATH101", 3).await;
    MaterialService::update(
        &db,
        material.id,
        MaterialInput {
            code: "MATH101".to_string(),
            name: "Algebra".to_string(),
            hours: Some(3),
            section_id: Some(1),
        },
    )
    .await
    .unwrap();

    let taken = SectionService::update(
        &db,
        1,
        SectionChanges {
            id: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(taken, ServiceError::Validation(_)));

    let rekeyed = SectionService::update(
        &db,
        1,
        SectionChanges {
            id: Some(10),
            name: Some("Sciences".to_string()),
            active: Some(false),
        },
    )
    .await
    .unwrap();
    assert_eq!(rekeyed.id, 10);
    assert_eq!(rekeyed.name, "Sciences");
    assert!(!rekeyed.active);

    let student = students::Entity::find_by_id(100i64).one(&db).await.unwrap().unwrap();
    assert_eq!(student.section_id, 10);
    let material = materials::Entity::find_by_id(material.id).one(&db).await.unwrap().unwrap();
    assert_eq!(material.section_id, Some(10));
    assert!(matches!(
        SectionService::get(&db, 1).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deleting_a_section_removes_its_students() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;

    SectionService::delete(&db, 1).await.unwrap();

    assert!(students::Entity::find_by_id(100i64).one(&db).await.unwrap().is_none());
    assert_eq!(ReportService::summary(&db).await.unwrap().students, 0);
}

#[tokio::test]
async fn creating_a_student_hashes_the_password() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;

    let student = StudentService::create(
        &db,
        NewStudent {
            id: 20240001,
            name: "Layla Hassan".to_string(),
            section_id: Some(1),
            email: "layla@example.edu".to_string(),
            password: "s3cret".to_string(),
            active: true,
        },
    )
    .await
    .unwrap();
    assert!(student.password_hash.starts_with("$argon2id$"));
    assert!(!student.password_hash.contains("s3cret"));

    let duplicate = StudentService::create(
        &db,
        NewStudent {
            id: 20240002,
            name: "Other".to_string(),
            section_id: Some(42),
            email: "layla@example.edu".to_string(),
            password: String::new(),
            active: true,
        },
    )
    .await
    .unwrap_err();
    match duplicate {
        ServiceError::Validation(fields) => {
            assert!(fields.contains_key("email"));
            assert!(fields.contains_key("section"));
            assert!(fields.contains_key("password"));
            assert!(!fields.contains_key("id"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn student_filters_and_updates() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::section(&db, 2, "Arts").await;
    common::student(&db, 100, 1).await;
    common::student(&db, 200, 2).await;

    let in_arts = StudentService::list(
        &db,
        &StudentFilter {
            section: NumericFilter::Exact(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(in_arts.len(), 1);
    assert_eq!(in_arts[0].id, 200);

    let malformed = StudentService::list(
        &db,
        &StudentFilter {
            id: NumericFilter::parse(Some("abc")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(malformed.is_empty());

    let updated = StudentService::update(
        &db,
        100,
        StudentChanges {
            name: Some("Omar".to_string()),
            section_id: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Omar");
    assert_eq!(updated.section_id, 2);

    let by_name = StudentService::list(
        &db,
        &StudentFilter {
            name: Some("oma".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);
}

#[tokio::test]
async fn student_detail_reports_weighted_gpa() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let a = common::material(&db, "A", 3).await;
    let b = common::material(&db, "B", 4).await;
    common::enrollment(&db, 100, a.id, "1", 2024, Some(80.0)).await;
    common::enrollment(&db, 100, b.id, "1", 2024, Some(90.0)).await;

    let detail = StudentService::detail(&db, 100).await.unwrap();

    assert_eq!(detail.enrollments.len(), 2);
    assert_eq!(detail.section.map(|s| s.id), Some(1));
    assert_eq!(detail.weighted_gpa.cumulative, 85.71);
    assert_eq!(detail.weighted_gpa.terms[0].gpa, 85.71);
    // No grade records yet, so the recorded average stays at zero
    assert_eq!(detail.recorded_average.cumulative, 0.0);
}

#[tokio::test]
async fn grade_form_applies_valid_fields_and_reports_the_rest() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    common::student(&db, 200, 1).await;
    let a = common::material(&db, "A", 3).await;
    let mine = common::enrollment(&db, 100, a.id, "1", 2024, Some(50.0)).await;
    let cleared = common::enrollment(&db, 100, a.id, "2", 2024, Some(60.0)).await;
    let theirs = common::enrollment(&db, 200, a.id, "1", 2024, None).await;

    let fields = HashMap::from([
        (format!("grade_{}", mine.id), "88.5".to_string()),
        (format!("grade_{}", cleared.id), "".to_string()),
        (format!("grade_{}", theirs.id), "70".to_string()),
        ("grade_x".to_string(), "70".to_string()),
        ("csrf".to_string(), "ignored".to_string()),
    ]);

    let outcome = StudentService::apply_grade_form(&db, 100, &fields).await.unwrap();

    assert_eq!(outcome.updated.len(), 2);
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors.contains_key(&format!("grade_{}", theirs.id)));

    let detail = StudentService::detail(&db, 100).await.unwrap();
    let grades: HashMap<i32, Option<f64>> = detail
        .enrollments
        .iter()
        .map(|(e, _)| (e.id, e.grade))
        .collect();
    assert_eq!(grades[&mine.id], Some(88.5));
    assert_eq!(grades[&cleared.id], None);

    let bad = HashMap::from([(format!("grade_{}", mine.id), "A+".to_string())]);
    let outcome = StudentService::apply_grade_form(&db, 100, &bad).await.unwrap();
    assert!(outcome.updated.is_empty());
    assert_eq!(outcome.errors.len(), 1);
}

#[tokio::test]
async fn material_validation_prevents_partial_saves() {
    let db = common::setup().await;
    common::material(&db, "MATH101", 3).await;

    let err = MaterialService::create(
        &db,
        MaterialInput {
            code: "MATH101".to_string(),
            name: " ".to_string(),
            hours: Some(0),
            section_id: Some(99),
        },
    )
    .await
    .unwrap_err();

    match err {
        ServiceError::Validation(fields) => {
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            assert_eq!(keys, ["code", "hours", "name", "section"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(
        MaterialService::list(&db, &MaterialFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn material_filters_and_detail() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = MaterialService::create(
        &db,
        MaterialInput {
            code: "MATH101".to_string(),
            name: "Linear Algebra".to_string(),
            hours: Some(3),
            section_id: Some(1),
        },
    )
    .await
    .unwrap();
    common::material(&db, "PHYS101", 4).await;
    common::enrollment(&db, 100, algebra.id, "1", 2024, None).await;

    let by_name = MaterialService::list(
        &db,
        &MaterialFilter {
            name: Some("algebra".to_string()),
            hours: NumericFilter::Exact(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);

    let malformed = MaterialService::list(
        &db,
        &MaterialFilter {
            hours: NumericFilter::parse(Some("three")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(malformed.is_empty());

    let detail = MaterialService::detail(&db, algebra.id).await.unwrap();
    assert_eq!(detail.enrollment_count, 1);
    assert!(detail.prerequisite.is_none());
    assert!(detail.lectures.is_empty());
}

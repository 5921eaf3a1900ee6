mod common;

use database::{
    entities::enrollments,
    error::ServiceError,
    services::{
        enrollment::{EnrollmentFilter, EnrollmentService, RegistrationRules},
        prerequisite::{PrerequisiteAssignment, PrerequisiteService},
    },
};
use models::{
    filter::NumericFilter,
    policy::{PassMark, PrerequisitePolicy},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DbErr, SqlErr};

#[tokio::test]
async fn registration_is_once_per_calendar_month() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    let physics = common::material(&db, "PHYS101", 4).await;
    let rules = RegistrationRules::default();

    let first = EnrollmentService::register(
        &db,
        100,
        &[algebra.id, physics.id, algebra.id],
        common::date(2025, 3, 2),
        rules,
    )
    .await
    .unwrap();
    assert_eq!(first.created.len(), 2);
    assert!(first.existing.is_empty());
    assert_eq!(first.created[0].semester, "3/2025");
    assert_eq!(first.created[0].year, 2025);

    let again = EnrollmentService::register(&db, 100, &[algebra.id], common::date(2025, 3, 28), rules)
        .await
        .unwrap();
    assert!(again.created.is_empty());
    assert_eq!(again.existing.len(), 1);

    let next_month = EnrollmentService::register(&db, 100, &[algebra.id], common::date(2025, 4, 1), rules)
        .await
        .unwrap();
    assert_eq!(next_month.created.len(), 1);
    assert_eq!(next_month.created[0].semester, "4/2025");

    let all = EnrollmentService::list(
        &db,
        &EnrollmentFilter {
            student_id: NumericFilter::Exact(100),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn storage_rejects_duplicate_enrollment() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    common::enrollment(&db, 100, algebra.id, "1", 2024, None).await;

    let err: DbErr = enrollments::ActiveModel {
        student_id: Set(100),
        material_id: Set(algebra.id),
        semester: Set("1".to_string()),
        year: Set(2024),
        grade: Set(Some(70.0)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn unknown_material_writes_nothing() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;

    let err = EnrollmentService::register(
        &db,
        100,
        &[algebra.id, 4242],
        common::date(2025, 3, 2),
        RegistrationRules::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Material", .. }));
    let all = EnrollmentService::list(&db, &EnrollmentFilter::default())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn enforced_policy_requires_passed_prerequisite() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let basics = common::material(&db, "MATH101", 3).await;
    let advanced = common::material(&db, "MATH201", 3).await;
    PrerequisiteService::assign(
        &db,
        vec![PrerequisiteAssignment {
            material_id: advanced.id,
            prerequisite: "MATH101".to_string(),
        }],
    )
    .await
    .unwrap();

    let enforce = RegistrationRules {
        policy: PrerequisitePolicy::Enforce,
        pass_mark: PassMark(50.0),
    };

    // Ignored by default
    let ignored = EnrollmentService::register(
        &db,
        100,
        &[advanced.id],
        common::date(2025, 1, 10),
        RegistrationRules::default(),
    )
    .await
    .unwrap();
    assert_eq!(ignored.created.len(), 1);

    let failing = common::enrollment(&db, 100, basics.id, "2/2025", 2025, Some(40.0)).await;
    let err = EnrollmentService::register(&db, 100, &[advanced.id], common::date(2025, 5, 1), enforce)
        .await
        .unwrap_err();
    match err {
        ServiceError::Forbidden(message) => assert!(message.contains("MATH201 requires MATH101")),
        other => panic!("expected forbidden, got {other:?}"),
    }

    let mut passed: enrollments::ActiveModel = failing.into();
    passed.grade = Set(Some(75.0));
    passed.update(&db).await.unwrap();

    let allowed = EnrollmentService::register(&db, 100, &[advanced.id], common::date(2025, 5, 1), enforce)
        .await
        .unwrap();
    assert_eq!(allowed.created.len(), 1);
}

#[tokio::test]
async fn removing_an_enrollment() {
    let db = common::setup().await;
    common::section(&db, 1, "Science").await;
    common::student(&db, 100, 1).await;
    let algebra = common::material(&db, "MATH101", 3).await;
    let enrollment = common::enrollment(&db, 100, algebra.id, "1", 2024, None).await;

    EnrollmentService::remove(&db, enrollment.id).await.unwrap();
    let err = EnrollmentService::remove(&db, enrollment.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

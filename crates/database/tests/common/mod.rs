#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use database::{
    db::create_connection_with,
    entities::{enrollments, materials, sections, students},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};

/// Fresh in-memory database with every migration applied
pub async fn setup() -> DatabaseConnection {
    let db = create_connection_with("sqlite::memory:", Some(1))
        .await
        .expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn section(db: &DatabaseConnection, id: i32, name: &str) -> sections::Model {
    sections::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        active: Set(true),
    }
    .insert(db)
    .await
    .expect("insert section")
}

/// Inserts a student directly, skipping password hashing
pub async fn student(db: &DatabaseConnection, id: i64, section_id: i32) -> students::Model {
    students::ActiveModel {
        id: Set(id),
        name: Set(format!("Student {id}")),
        section_id: Set(section_id),
        email: Set(format!("student{id}@example.edu")),
        password_hash: Set("unused".to_string()),
        active: Set(true),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .expect("insert student")
}

pub async fn material(db: &DatabaseConnection, code: &str, hours: i32) -> materials::Model {
    materials::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("{code} name")),
        hours: Set(hours),
        section_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert material")
}

pub async fn enrollment(
    db: &DatabaseConnection,
    student_id: i64,
    material_id: i32,
    semester: &str,
    year: i32,
    grade: Option<f64>,
) -> enrollments::Model {
    enrollments::ActiveModel {
        student_id: Set(student_id),
        material_id: Set(material_id),
        semester: Set(semester.to_string()),
        year: Set(year),
        grade: Set(grade),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert enrollment")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

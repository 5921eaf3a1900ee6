pub mod dashboard;
pub mod enrollment;
pub mod grade;
pub mod health;
pub mod material;
pub mod prerequisite;
pub mod root;
pub mod section;
pub mod student;
pub mod timetable;

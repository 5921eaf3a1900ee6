pub mod enrollments;
pub mod grade_records;
pub mod lectures;
pub mod material_prerequisites;
pub mod materials;
pub mod sections;
pub mod students;

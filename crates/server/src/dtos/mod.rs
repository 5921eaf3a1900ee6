pub mod enrollment;
pub mod grade;
pub mod material;
pub mod prerequisite;
pub mod report;
pub mod section;
pub mod student;
pub mod timetable;

pub(crate) fn default_true() -> bool {
    true
}

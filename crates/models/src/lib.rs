pub mod filter;
pub mod gpa;
pub mod policy;
pub mod term;
pub mod timetable;

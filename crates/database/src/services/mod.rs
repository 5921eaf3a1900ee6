pub mod enrollment;
pub mod grade;
pub mod material;
pub mod prerequisite;
pub mod report;
pub mod section;
pub mod student;
pub mod timetable;

use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Case-insensitive substring match; `needle` must already be lowercase
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{needle}%"))
}

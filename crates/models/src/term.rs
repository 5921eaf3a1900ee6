use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// An academic term, identified by a free-form semester label and a year
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    pub semester: String,
    pub year: i32,
}

impl Term {
    pub fn new(semester: impl Into<String>, year: i32) -> Self {
        Self {
            semester: semester.into(),
            year,
        }
    }

    /// The registration term for a calendar month, labelled `"{month}/{year}"`
    pub fn of_month(date: NaiveDate) -> Self {
        Self {
            semester: format!("{}/{}", date.month(), date.year()),
            year: date.year(),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.semester, self.year)
    }
}

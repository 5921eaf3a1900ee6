use serde::Serialize;
use std::collections::BTreeMap;

use crate::term::Term;

/// Rounds a grade average to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Plain arithmetic mean of the recorded grades, rounded to two decimals.
///
/// Missing grades are ignored. Returns 0 when nothing has been graded yet.
pub fn average<I>(grades: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = grades
        .into_iter()
        .flatten()
        .fold((0.0, 0u32), |(sum, count), grade| (sum + grade, count + 1));

    if count == 0 {
        0.0
    } else {
        round2(sum / f64::from(count))
    }
}

/// One graded (or not yet graded) enrollment, as needed for the credit-weighted GPA
#[derive(Debug, Clone, PartialEq)]
pub struct CreditedGrade {
    pub term: Term,
    pub hours: i32,
    pub grade: Option<f64>,
}

/// Running Σ(grade × hours) / Σ(hours)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedAverage {
    points: f64,
    hours: i64,
}

impl WeightedAverage {
    pub fn add(&mut self, grade: f64, hours: i32) {
        self.points += grade * f64::from(hours);
        self.hours += i64::from(hours);
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    /// The rounded weighted mean, 0 when no credit hours were counted
    pub fn value(&self) -> f64 {
        if self.hours <= 0 {
            0.0
        } else {
            round2(self.points / self.hours as f64)
        }
    }
}

/// Credit-weighted GPA for a single term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermGpa {
    pub semester: String,
    pub year: i32,
    pub gpa: f64,
    pub hours: i64,
}

/// Credit-weighted GPA per term and across all terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedGpa {
    pub terms: Vec<TermGpa>,
    pub cumulative: f64,
    pub hours: i64,
}

impl WeightedGpa {
    /// Folds enrollments into per-term and cumulative weighted averages.
    ///
    /// Ungraded enrollments contribute neither points nor hours. Terms are
    /// ordered chronologically by year, then by semester label.
    pub fn from_grades<'a, I>(grades: I) -> Self
    where
        I: IntoIterator<Item = &'a CreditedGrade>,
    {
        let mut by_term: BTreeMap<(i32, String), WeightedAverage> = BTreeMap::new();
        let mut overall = WeightedAverage::default();

        for entry in grades {
            let Some(grade) = entry.grade else {
                continue;
            };

            by_term
                .entry((entry.term.year, entry.term.semester.clone()))
                .or_default()
                .add(grade, entry.hours);
            overall.add(grade, entry.hours);
        }

        let terms = by_term
            .into_iter()
            .map(|((year, semester), avg)| TermGpa {
                semester,
                year,
                gpa: avg.value(),
                hours: avg.hours(),
            })
            .collect();

        Self {
            terms,
            cumulative: overall.value(),
            hours: overall.hours(),
        }
    }
}

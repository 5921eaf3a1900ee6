use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether registering a material requires its prerequisite to be passed first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PrerequisitePolicy {
    /// Registrations never look at prerequisites
    #[default]
    Ignore,
    /// A registration is refused until the prerequisite has a passing grade
    Enforce,
}

/// Lowest grade that counts as passing a material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassMark(pub f64);

impl Default for PassMark {
    fn default() -> Self {
        PassMark(50.0)
    }
}

impl PassMark {
    pub fn passes(self, grade: Option<f64>) -> bool {
        grade.is_some_and(|grade| grade >= self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            PrerequisitePolicy::from_str("ENFORCE").unwrap(),
            PrerequisitePolicy::Enforce
        );
        assert_eq!(
            PrerequisitePolicy::from_str("ignore").unwrap(),
            PrerequisitePolicy::Ignore
        );
        assert!(PrerequisitePolicy::from_str("sometimes").is_err());
        assert_eq!(PrerequisitePolicy::Enforce.to_string(), "enforce");
    }

    #[test]
    fn test_pass_mark() {
        let mark = PassMark::default();
        assert!(mark.passes(Some(50.0)));
        assert!(!mark.passes(Some(49.99)));
        assert!(!mark.passes(None));
    }
}

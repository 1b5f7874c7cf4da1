//! Disease identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of diseases this build can classify.
///
/// Each disease selects its own schema, classifier bundle, label table and
/// clinical rule function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disease {
    LassaFever,
    Measles,
    Cholera,
    YellowFever,
}

impl Disease {
    /// Every disease, in form-menu order.
    pub const ALL: [Disease; 4] = [
        Disease::LassaFever,
        Disease::Measles,
        Disease::Cholera,
        Disease::YellowFever,
    ];

    /// Human-readable name shown by the form layer.
    pub fn name(&self) -> &'static str {
        match self {
            Disease::LassaFever => "Lassa Fever",
            Disease::Measles => "Measles",
            Disease::Cholera => "Cholera",
            Disease::YellowFever => "Yellow Fever",
        }
    }

    /// File-system slug used for artifact lookup.
    pub fn slug(&self) -> &'static str {
        match self {
            Disease::LassaFever => "lassa_fever",
            Disease::Measles => "measles",
            Disease::Cholera => "cholera",
            Disease::YellowFever => "yellow_fever",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A disease name the build does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disease: {0}")]
pub struct UnknownDisease(pub String);

impl FromStr for Disease {
    type Err = UnknownDisease;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Disease::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted) || d.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownDisease(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_slug() {
        assert_eq!("Lassa Fever".parse::<Disease>().unwrap(), Disease::LassaFever);
        assert_eq!("lassa_fever".parse::<Disease>().unwrap(), Disease::LassaFever);
        assert_eq!("yellow fever".parse::<Disease>().unwrap(), Disease::YellowFever);
        assert_eq!(" Cholera ".parse::<Disease>().unwrap(), Disease::Cholera);
    }

    #[test]
    fn test_unknown_disease() {
        let err = "Dengue".parse::<Disease>().unwrap_err();
        assert_eq!(err, UnknownDisease("Dengue".into()));
    }

    #[test]
    fn test_display_matches_name() {
        for disease in Disease::ALL {
            assert_eq!(disease.to_string(), disease.name());
        }
    }
}

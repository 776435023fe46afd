//! Disease domains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PredictError;

/// One disease-prediction use case, each with its own form schema and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Heart,
    Diabetes,
    Cancer,
}

impl Domain {
    /// All domains, in selector order.
    pub const ALL: [Domain; 3] = [Domain::Heart, Domain::Diabetes, Domain::Cancer];

    /// URL and command-line name.
    pub fn slug(&self) -> &'static str {
        match self {
            Domain::Heart => "heart",
            Domain::Diabetes => "diabetes",
            Domain::Cancer => "cancer",
        }
    }

    /// Selector label.
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Heart => "Heart Disease",
            Domain::Diabetes => "Diabetes",
            Domain::Cancer => "Cancer",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Domain {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heart" | "heart-disease" | "heart_disease" => Ok(Domain::Heart),
            "diabetes" => Ok(Domain::Diabetes),
            "cancer" | "breast-cancer" | "breast_cancer" => Ok(Domain::Cancer),
            _ => Err(PredictError::UnknownDomain(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trips_through_slug() {
        for domain in Domain::ALL {
            assert_eq!(domain.slug().parse::<Domain>().unwrap(), domain);
        }
    }

    #[test]
    fn test_domain_accepts_aliases_case_insensitively() {
        assert_eq!("Heart-Disease".parse::<Domain>().unwrap(), Domain::Heart);
        assert_eq!(" breast_cancer ".parse::<Domain>().unwrap(), Domain::Cancer);
        assert_eq!("DIABETES".parse::<Domain>().unwrap(), Domain::Diabetes);
    }

    #[test]
    fn test_unknown_domain_is_rejected() {
        let err = "kidney".parse::<Domain>().expect_err("should reject");
        assert!(matches!(err, PredictError::UnknownDomain(name) if name == "kidney"));
    }
}

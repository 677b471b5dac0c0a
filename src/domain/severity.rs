use std::{fmt, str::FromStr};

/// Rule severity as assigned by DISA.
///
/// Severities are a closed enumeration. The [`Rule`](super::Rule) entity
/// stores severity as free text because it is user-adjustable; values are
/// validated here, at the point where a priority is actually derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// CAT I findings.
    High,
    /// CAT II findings.
    Medium,
    /// CAT III findings.
    Low,
}

impl Severity {
    /// The numeric rank used by the priority formula.
    ///
    /// High ranks 1, medium 2, low 3. Counter-intuitively the *lowest*
    /// rank is the most severe; the rank is a multiplier, and the
    /// resulting score maps onto priority tiers where higher scores mean
    /// lower urgency.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{text}")
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::UnknownSeverity(other.to_string())),
        }
    }
}

/// Errors that can occur while deriving a ticket priority.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The severity text is outside the closed enumeration.
    #[error("unknown severity '{0}': expected one of 'high', 'medium', 'low'")]
    UnknownSeverity(String),

    /// The weight text does not parse as a number.
    #[error("invalid weight '{0}': expected a number")]
    InvalidWeight(String),
}

/// Maps a raw score onto an external ticket priority tier in `1..=5`.
///
/// The bands are inclusive-exclusive: a score of exactly 14 falls in tier
/// 2, not tier 1.
#[must_use]
pub const fn priority_tier(raw_score: f64) -> u8 {
    if raw_score < 14.0 {
        1
    } else if raw_score < 18.0 {
        2
    } else if raw_score < 22.0 {
        3
    } else if raw_score < 26.0 {
        4
    } else {
        5
    }
}

/// Derives the external ticket priority tier from a rule's severity and
/// weight text.
///
/// The raw score is `rank(severity) * weight`, mapped through
/// [`priority_tier`]. Both inputs are taken as text because the entity
/// layer stores them unvalidated.
///
/// # Errors
///
/// Returns [`Error::UnknownSeverity`] if the severity is not one of
/// `high`, `medium`, `low`, and [`Error::InvalidWeight`] if the weight is
/// not numeric.
pub fn derive_ticket_priority(severity: &str, weight: &str) -> Result<u8, Error> {
    let severity: Severity = severity.parse()?;
    let weight: f64 = weight
        .parse()
        .map_err(|_| Error::InvalidWeight(weight.to_string()))?;

    Ok(priority_tier(f64::from(severity.rank()) * weight))
}

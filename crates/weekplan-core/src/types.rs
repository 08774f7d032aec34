use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeekplanError;

/// Canonical day of the week. Serialised as the lowercase English name,
/// which is also the form stored in the `schedules.day` column.
///
/// Variant order is week order, so `Ord` sorts Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All seven days in week order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Day {
    type Err = WeekplanError;

    /// Exact, case-sensitive match: "Monday" is not a canonical day.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| WeekplanError::InvalidDay(s.to_string()))
    }
}

/// Why a raw email string was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailRejection {
    Empty,
    MissingAt,
}

/// An email address that passed the only check we make: non-empty and
/// containing an `@`. No RFC 5322 parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> std::result::Result<Self, EmailRejection> {
        if raw.is_empty() {
            return Err(EmailRejection::Empty);
        }
        if !raw.contains('@') {
            return Err(EmailRejection::MissingAt);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_canonical_day() {
        for day in Day::ALL {
            assert_eq!(day.as_str().parse::<Day>().unwrap(), day);
        }
    }

    #[test]
    fn rejects_non_canonical_days() {
        for raw in ["Monday", "MONDAY", "mon", "", " monday", "funday"] {
            assert!(raw.parse::<Day>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn day_serialises_lowercase() {
        let json = serde_json::to_string(&Day::Wednesday).unwrap();
        assert_eq!(json, r#""wednesday""#);
    }

    #[test]
    fn days_sort_in_week_order() {
        let mut days = vec![Day::Sunday, Day::Monday, Day::Friday];
        days.sort();
        assert_eq!(days, vec![Day::Monday, Day::Friday, Day::Sunday]);
    }

    #[test]
    fn email_requires_at_sign() {
        assert_eq!(Email::parse(""), Err(EmailRejection::Empty));
        assert_eq!(Email::parse("alice.example.com"), Err(EmailRejection::MissingAt));
        assert_eq!(Email::parse("a@b.com").unwrap().as_str(), "a@b.com");
        // Only the '@' is checked.
        assert!(Email::parse("@").is_ok());
    }
}

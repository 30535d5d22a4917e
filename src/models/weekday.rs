//! Calendar weekdays

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Day of the week, ordered Monday to Sunday
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// All weekdays in canonical order
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Lowercase key used in wire payloads and stored documents
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekDay::Monday => "monday",
            WeekDay::Tuesday => "tuesday",
            WeekDay::Wednesday => "wednesday",
            WeekDay::Thursday => "thursday",
            WeekDay::Friday => "friday",
            WeekDay::Saturday => "saturday",
            WeekDay::Sunday => "sunday",
        }
    }
}

impl std::str::FromStr for WeekDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        WeekDay::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownWeekDay(s.to_string()))
    }
}

impl std::fmt::Display for WeekDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("monday".parse::<WeekDay>().unwrap(), WeekDay::Monday);
        assert_eq!(" Friday ".parse::<WeekDay>().unwrap(), WeekDay::Friday);
        assert_eq!("SUNDAY".parse::<WeekDay>().unwrap(), WeekDay::Sunday);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "funday".parse::<WeekDay>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownWeekDay("funday".to_string()));
    }

    #[test]
    fn test_canonical_order() {
        let mut days = vec![WeekDay::Sunday, WeekDay::Wednesday, WeekDay::Monday];
        days.sort();
        assert_eq!(days, vec![WeekDay::Monday, WeekDay::Wednesday, WeekDay::Sunday]);
    }

    #[test]
    fn test_serde_name_matches_key() {
        for day in WeekDay::ALL {
            let json = serde_json::to_string(&day).unwrap();
            assert_eq!(json, format!("\"{}\"", day.as_str()));
        }
    }
}

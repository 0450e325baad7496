use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The meal categories attendance is recorded for. Each one has its own
/// collection in the store and its own URL scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    /// Table holding this meal's attendance records.
    pub fn table(self) -> &'static str {
        match self {
            MealType::Lunch => "lunch_attendance",
            MealType::Dinner => "dinner_attendance",
        }
    }

    pub fn scope(self) -> String {
        format!("/{}", self.as_ref())
    }

    /// Capitalised name used in response messages.
    pub fn label(self) -> &'static str {
        match self {
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Yes,
    No,
}

impl AttendanceStatus {
    /// Headcount stored for this status. Only "yes" carries a count; a missing
    /// or zero count on "yes" means the user alone.
    pub fn effective_count(self, requested: Option<u32>) -> u32 {
        match self {
            AttendanceStatus::Yes => requested.filter(|c| *c > 0).unwrap_or(1),
            AttendanceStatus::No => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "email": "jane@company.com",
        "name": "Jane Doe",
        "date": "2026-01-15",
        "status": "yes",
        "count": 2,
        "updated_at": "2026-01-15T09:30:00Z"
    })
)]
pub struct AttendanceRecord {
    pub email: String,
    pub name: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub count: u32,
    pub updated_at: DateTime<Utc>,
}

/// Values written by one submission, keyed by (email, date).
#[derive(Debug, Clone)]
pub struct AttendanceWrite {
    pub email: String,
    pub name: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn no_always_counts_zero() {
        assert_eq!(AttendanceStatus::No.effective_count(Some(5)), 0);
        assert_eq!(AttendanceStatus::No.effective_count(None), 0);
    }

    #[test]
    fn yes_defaults_to_one() {
        assert_eq!(AttendanceStatus::Yes.effective_count(None), 1);
        assert_eq!(AttendanceStatus::Yes.effective_count(Some(0)), 1);
        assert_eq!(AttendanceStatus::Yes.effective_count(Some(3)), 3);
    }

    #[test]
    fn meal_types_have_distinct_tables_and_scopes() {
        let meals: Vec<_> = MealType::iter().collect();
        assert_eq!(meals, vec![MealType::Lunch, MealType::Dinner]);
        assert_eq!(MealType::Lunch.scope(), "/lunch");
        assert_eq!(MealType::Dinner.table(), "dinner_attendance");
        assert_eq!(MealType::from_str("dinner").unwrap(), MealType::Dinner);
    }

    #[test]
    fn status_parses_lowercase_only() {
        assert_eq!(AttendanceStatus::from_str("yes").unwrap(), AttendanceStatus::Yes);
        assert!(AttendanceStatus::from_str("maybe").is_err());
    }
}

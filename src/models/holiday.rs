//! Holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A holiday excluded from working-day counts.
///
/// The holiday set is append-only; durations computed from an earlier
/// snapshot are never recomputed when new holidays are added.
///
/// # Example
///
/// ```
/// use hr_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2024, 1, 26).unwrap(),
///     name: "Republic Day".to_string(),
///     description: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The calendar date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

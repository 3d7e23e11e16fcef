//! Raw rows returned by the catalog source.
//!
//! Every nullable column is an `Option`; the offer builder decides what a
//! missing value means.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekdays in column order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One weekday column of a class row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot<'a> {
    pub weekday: Weekday,
    /// Raw time value as stored, e.g. `18:30:00`
    pub time: Option<&'a str>,
}

/// A currently running class joined with its studio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ClassRow {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Description of the most recent style attached to the class
    #[serde(default)]
    pub style_description: Option<String>,
    #[serde(default)]
    pub mon: Option<String>,
    #[serde(default)]
    pub tue: Option<String>,
    #[serde(default)]
    pub wed: Option<String>,
    #[serde(default)]
    pub thu: Option<String>,
    #[serde(default)]
    pub fri: Option<String>,
    #[serde(default)]
    pub sat: Option<String>,
    #[serde(default)]
    pub sun: Option<String>,
    #[serde(default)]
    pub studio_title: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
}

impl ClassRow {
    /// The seven weekday columns, Monday first.
    pub fn schedule(&self) -> [ScheduleSlot<'_>; 7] {
        let times = [
            &self.mon, &self.tue, &self.wed, &self.thu, &self.fri, &self.sat, &self.sun,
        ];
        std::array::from_fn(|i| ScheduleSlot {
            weekday: WEEKDAYS[i],
            time: times[i].as_deref(),
        })
    }
}

/// An active ticket type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct PassRow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    /// Validity in days
    #[serde(default)]
    pub lifetime: Option<i64>,
    /// Included lessons
    #[serde(default)]
    pub hours: Option<i64>,
    #[serde(default)]
    pub freeze_allowed: Option<i64>,
    #[serde(default)]
    pub guest_visits: Option<i64>,
}

/// A pass row with every field required for publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletePass<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub lifetime: i64,
    pub hours: i64,
    pub freeze_allowed: bool,
    pub guest_visits: i64,
}

impl PassRow {
    /// Returns `None` when price, description, lifetime or hours is missing.
    pub fn complete(&self) -> Option<CompletePass<'_>> {
        let (Some(description), Some(price), Some(lifetime), Some(hours)) = (
            self.description.as_deref(),
            self.price,
            self.lifetime,
            self.hours,
        ) else {
            return None;
        };

        Some(CompletePass {
            name: &self.name,
            description,
            price,
            lifetime,
            hours,
            freeze_allowed: self.freeze_allowed.is_some_and(|f| f > 0),
            guest_visits: self.guest_visits.unwrap_or(0),
        })
    }
}

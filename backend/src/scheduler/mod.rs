//! Activity scheduler.
//!
//! Expands activity rules into a weekday calendar and the reminders that fall
//! inside the week of a reference date. Expansion is a pure function of its
//! inputs: no clock, no I/O, no shared state.
//!
//! Reminder rules per repetition:
//!
//! - `weekly`: every listed day of the reference week.
//! - `one-time`: a listed day only when it is the reference date itself.
//! - `monthly`: the first listed day only, when its date in the reference
//!   week has the same day-of-month as the reference date.

mod error;


pub use error::ValidationError;

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityInput, ActivityRule, ActivityTime, Repetition, Weekday};

/// Reference date used when the caller does not supply one (2025-06-09).
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).expect("2025-06-09 is a valid date")
}

/// Parse a `YYYY-MM-DD` reference date, falling back to the default.
///
/// The literal must be exactly four year digits, two month digits and two
/// day digits separated by `-`.
pub fn parse_reference_date(value: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let Some(raw) = value else {
        return Ok(default_reference_date());
    };
    let bad = || ValidationError::BadReferenceDate {
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(bad());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| bad())
}

/// Monday on or before `date`, clamped to the earliest representable date.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN)
}

/// Date of `day` within the week starting at `week_start`.
///
/// `None` when the date falls past the representable range.
pub fn occurrence_date(week_start: NaiveDate, day: Weekday) -> Option<NaiveDate> {
    week_start.checked_add_days(Days::new(u64::from(day.days_from_monday())))
}

/// An activity placed on a weekday of the calendar view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub name: String,
    pub time: ActivityTime,
    pub location: String,
    pub caregiver: String,
    pub repetition: Repetition,
}

impl From<&ActivityRule> for CalendarEntry {
    fn from(rule: &ActivityRule) -> Self {
        Self {
            name: rule.name.clone(),
            time: rule.time,
            location: rule.location.clone(),
            caregiver: rule.caregiver.clone(),
            repetition: rule.repetition,
        }
    }
}

/// A dated reminder for one occurrence in the reference week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub date: NaiveDate,
    pub day: Weekday,
    pub time: ActivityTime,
    pub name: String,
    pub location: String,
    pub caregiver: String,
    pub message: String,
}

impl ReminderEvent {
    fn new(rule: &ActivityRule, day: Weekday, date: NaiveDate) -> Self {
        let message = format!(
            "Reminder: {} on {}, {} at {} at {} (Caregiver: {})",
            rule.name,
            day,
            date.format("%Y-%m-%d"),
            rule.time,
            rule.location,
            rule.caregiver
        );
        Self {
            date,
            day,
            time: rule.time,
            name: rule.name.clone(),
            location: rule.location.clone(),
            caregiver: rule.caregiver.clone(),
            message,
        }
    }
}

/// Calendar view plus reminders for one reference week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOverview {
    /// Entries per weekday, sorted by time. All seven days are present.
    pub calendar: BTreeMap<Weekday, Vec<CalendarEntry>>,
    /// Reminders sorted by date, then time.
    pub reminders: Vec<ReminderEvent>,
}

impl ActivityOverview {
    pub fn entries(&self, day: Weekday) -> &[CalendarEntry] {
        self.calendar.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Expand validated rules for the week containing `reference_date`.
pub fn expand(activities: &[ActivityRule], reference_date: NaiveDate) -> ActivityOverview {
    let week_start = start_of_week(reference_date);

    let mut calendar: BTreeMap<Weekday, Vec<CalendarEntry>> = Weekday::ALL
        .into_iter()
        .map(|day| (day, Vec::new()))
        .collect();
    let mut reminders = Vec::new();

    for rule in activities {
        for day in &rule.days {
            calendar
                .entry(*day)
                .or_default()
                .push(CalendarEntry::from(rule));
        }

        match rule.repetition {
            Repetition::Weekly => {
                for day in &rule.days {
                    if let Some(date) = occurrence_date(week_start, *day) {
                        reminders.push(ReminderEvent::new(rule, *day, date));
                    }
                }
            }
            Repetition::OneTime => {
                for day in &rule.days {
                    if occurrence_date(week_start, *day) == Some(reference_date) {
                        reminders.push(ReminderEvent::new(rule, *day, reference_date));
                    }
                }
            }
            Repetition::Monthly => {
                let anchor = rule
                    .monthly_anchor()
                    .and_then(|day| occurrence_date(week_start, day).map(|date| (day, date)));
                if let Some((day, date)) = anchor {
                    if date.day() == reference_date.day() {
                        reminders.push(ReminderEvent::new(rule, day, date));
                    }
                }
            }
        }
    }

    // sort_by_key is stable: equal times keep input order.
    for entries in calendar.values_mut() {
        entries.sort_by_key(|entry| entry.time);
    }
    reminders.sort_by_key(|reminder| (reminder.date, reminder.time));

    ActivityOverview {
        calendar,
        reminders,
    }
}

/// Validate every input, stopping at the first rejected one.
pub fn validate_all(inputs: &[ActivityInput]) -> Result<Vec<ActivityRule>, ValidationError> {
    inputs.iter().map(ActivityInput::validate).collect()
}

/// Validate raw inputs and expand them.
///
/// `reference_date` is a `YYYY-MM-DD` literal; `None` selects
/// [`default_reference_date`]. Nothing is returned if any input is invalid.
pub fn expand_inputs(
    inputs: &[ActivityInput],
    reference_date: Option<&str>,
) -> Result<ActivityOverview, ValidationError> {
    let reference_date = parse_reference_date(reference_date)?;
    let rules = validate_all(inputs)?;
    Ok(expand(&rules, reference_date))
}

//! Activity rules and the calendar vocabulary they are written in.
//!
//! [`ActivityInput`] is the loosely-typed record accepted at the boundary
//! (JSON bodies, activity files, stored rows). [`ActivityInput::validate`]
//! turns it into an [`ActivityRule`], whose fields are mandatory and typed by
//! construction. The scheduler only ever works with validated rules.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::scheduler::ValidationError;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in calendar order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical title-case name ("Monday").
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Lower-case key used by meal plans ("monday").
    pub fn as_key(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Look up a weekday by its lower-case meal plan key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_key() == key)
    }

    /// Number of days after Monday (Monday = 0).
    pub fn days_from_monday(&self) -> u32 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Only the canonical title-case names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

/// How often an activity recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repetition {
    Weekly,
    Monthly,
    OneTime,
}

impl Repetition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Repetition::Weekly => "weekly",
            Repetition::Monthly => "monthly",
            Repetition::OneTime => "one-time",
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Repetition {
    type Err = String;

    /// Case-insensitive ("Weekly", "ONE-TIME", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "one-time" => Ok(Self::OneTime),
            _ => Err(format!("Unknown repetition: {}", s)),
        }
    }
}

/// Wall-clock time of day, written `HH:MM` in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityTime(NaiveTime);

impl FromStr for ActivityTime {
    type Err = String;

    /// Requires exactly two hour digits, a colon and two minute digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !shaped {
            return Err(format!("Expected HH:MM, got '{}'", s));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|e| format!("Invalid time '{}': {}", s, e))
    }
}

impl fmt::Display for ActivityTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ActivityTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ActivityTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Weekday names as supplied by a caller: a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayList {
    One(String),
    Many(Vec<String>),
}

impl DayList {
    /// Normalize to a list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            DayList::One(day) => vec![day.clone()],
            DayList::Many(days) => days.clone(),
        }
    }
}

/// Unvalidated activity as received from a caller or the activity store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<DayList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caregiver: Option<String>,
    #[serde(default)]
    pub driver_required: bool,
}

impl ActivityInput {
    /// Build a fully populated input.
    pub fn new(
        name: impl Into<String>,
        time: impl Into<String>,
        days: &[&str],
        location: impl Into<String>,
        repetition: impl Into<String>,
        caregiver: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            time: Some(time.into()),
            days: Some(DayList::Many(days.iter().map(|d| d.to_string()).collect())),
            location: Some(location.into()),
            repetition: Some(repetition.into()),
            caregiver: Some(caregiver.into()),
            driver_required: false,
        }
    }

    pub fn with_driver_required(mut self, driver_required: bool) -> Self {
        self.driver_required = driver_required;
        self
    }

    /// Validate the record into an [`ActivityRule`].
    ///
    /// Checks run in a fixed order: field presence, time format, weekday
    /// names, repetition. The first failure is returned.
    pub fn validate(&self) -> Result<ActivityRule, ValidationError> {
        let label = self
            .name
            .clone()
            .unwrap_or_else(|| "<unnamed>".to_string());
        let missing = |field: &'static str| ValidationError::MissingField {
            activity: label.clone(),
            field,
        };

        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| missing("name"))?;
        let time = self.time.as_deref().ok_or_else(|| missing("time"))?;
        let days = self
            .days
            .as_ref()
            .map(DayList::to_vec)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| missing("days"))?;
        let location = self.location.as_deref().ok_or_else(|| missing("location"))?;
        let repetition = self
            .repetition
            .as_deref()
            .ok_or_else(|| missing("repetition"))?;
        let caregiver = self
            .caregiver
            .as_deref()
            .ok_or_else(|| missing("caregiver"))?;

        let time = time.parse::<ActivityTime>().map_err(|_| ValidationError::BadTime {
            activity: name.to_string(),
            value: time.to_string(),
        })?;

        let days = days
            .iter()
            .map(|day| {
                day.parse::<Weekday>().map_err(|_| ValidationError::BadDay {
                    activity: name.to_string(),
                    value: day.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let repetition =
            repetition
                .parse::<Repetition>()
                .map_err(|_| ValidationError::BadRepetition {
                    activity: name.to_string(),
                    value: repetition.to_string(),
                })?;

        Ok(ActivityRule {
            name: name.to_string(),
            time,
            days,
            location: location.to_string(),
            repetition,
            caregiver: caregiver.to_string(),
            driver_required: self.driver_required,
        })
    }
}

impl From<&ActivityRule> for ActivityInput {
    fn from(rule: &ActivityRule) -> Self {
        Self {
            name: Some(rule.name.clone()),
            time: Some(rule.time.to_string()),
            days: Some(DayList::Many(
                rule.days.iter().map(|d| d.as_str().to_string()).collect(),
            )),
            location: Some(rule.location.clone()),
            repetition: Some(rule.repetition.as_str().to_string()),
            caregiver: Some(rule.caregiver.clone()),
            driver_required: rule.driver_required,
        }
    }
}

/// A validated recurring or one-time activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRule {
    pub name: String,
    pub time: ActivityTime,
    pub days: Vec<Weekday>,
    pub location: String,
    pub repetition: Repetition,
    pub caregiver: String,
    #[serde(default)]
    pub driver_required: bool,
}

impl ActivityRule {
    /// The weekday a monthly activity is anchored to.
    ///
    /// Monthly activities only honour the first listed day; any further days
    /// still show up in the calendar but never produce reminders.
    pub fn monthly_anchor(&self) -> Option<Weekday> {
        self.days.first().copied()
    }
}

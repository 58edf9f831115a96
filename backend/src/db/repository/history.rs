//! Timestamped history of stored entities.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{ActivityRule, MealPlan, ScheduleEntry, ShoppingList};

/// Literal form of a stored row timestamp (UTC, whole seconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kinds of stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    FamilyMember,
    Activity,
    MealPlan,
    ShoppingList,
    Schedule,
}

impl Entity {
    pub const ALL: [Entity; 5] = [
        Entity::FamilyMember,
        Entity::Activity,
        Entity::MealPlan,
        Entity::ShoppingList,
        Entity::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::FamilyMember => "FamilyMember",
            Entity::Activity => "Activity",
            Entity::MealPlan => "MealPlan",
            Entity::ShoppingList => "ShoppingList",
            Entity::Schedule => "Schedule",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| format!("Unknown entity: {}", s))
    }
}

/// The rows of one entity stored at a single timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Snapshot {
    FamilyMembers(Vec<String>),
    Activities(Vec<ActivityRule>),
    MealPlan(MealPlan),
    ShoppingList(ShoppingList),
    Schedule(Vec<ScheduleEntry>),
}

impl Snapshot {
    pub fn entity(&self) -> Entity {
        match self {
            Snapshot::FamilyMembers(_) => Entity::FamilyMember,
            Snapshot::Activities(_) => Entity::Activity,
            Snapshot::MealPlan(_) => Entity::MealPlan,
            Snapshot::ShoppingList(_) => Entity::ShoppingList,
            Snapshot::Schedule(_) => Entity::Schedule,
        }
    }
}

/// Read access to historical rows.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Distinct row timestamps for `entity`, newest first.
    async fn timestamps(&self, entity: Entity) -> RepositoryResult<Vec<NaiveDateTime>>;

    /// Rows of `entity` stored exactly at `at`.
    ///
    /// Family members and activities return every matching row; the other
    /// entities return the first matching row.
    ///
    /// # Errors
    /// * `RepositoryError::NotFound` - If nothing was stored at that timestamp
    async fn snapshot(&self, entity: Entity, at: NaiveDateTime) -> RepositoryResult<Snapshot>;
}

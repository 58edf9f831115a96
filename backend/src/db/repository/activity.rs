//! Family member and activity rule storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{ActivityRule, FamilyMember};

/// Storage for family members and activity rules.
///
/// Implementations must be `Send + Sync` so one instance can be shared across
/// tasks. Listing methods return rows newest first.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Register a family member.
    async fn save_family_member(&self, name: &str) -> RepositoryResult<()>;

    /// All registered family members, newest first.
    async fn list_family_members(&self) -> RepositoryResult<Vec<FamilyMember>>;

    /// Insert an activity rule.
    async fn save_activity(&self, rule: &ActivityRule) -> RepositoryResult<()>;

    /// Delete every activity named `old_name` and insert `rule`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows removed
    async fn replace_activity(&self, old_name: &str, rule: &ActivityRule)
        -> RepositoryResult<usize>;

    /// Delete every activity named `name`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows removed (0 if none matched)
    async fn delete_activity(&self, name: &str) -> RepositoryResult<usize>;

    /// The current activity set, newest first.
    async fn list_activities(&self) -> RepositoryResult<Vec<ActivityRule>>;
}

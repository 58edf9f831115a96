//! In-memory local repository implementation.
//!
//! Stores every entity as a list of timestamped rows, the same way a table
//! with an insertion timestamp column would. Suitable for unit tests, the
//! command-line front end and local development.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::models::{ActivityRule, FamilyMember, MealPlan, ScheduleEntry, ShoppingList};

/// Source of row timestamps.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// A stored row and the moment it was inserted.
#[derive(Debug, Clone)]
struct Stamped<T> {
    at: NaiveDateTime,
    value: T,
}

#[derive(Default)]
struct LocalData {
    family_members: Vec<Stamped<FamilyMember>>,
    activities: Vec<Stamped<ActivityRule>>,
    meal_plans: Vec<Stamped<MealPlan>>,
    shopping_lists: Vec<Stamped<ShoppingList>>,
    schedules: Vec<Stamped<Vec<ScheduleEntry>>>,
}

/// In-memory local repository.
///
/// # Example
/// ```
/// use family_planner::db::repositories::LocalRepository;
/// use family_planner::db::repository::ActivityRepository;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.save_family_member("Alice").await.unwrap();
///     assert_eq!(repo.list_family_members().await.unwrap().len(), 1);
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    healthy: Arc<RwLock<bool>>,
    clock: Clock,
}

/// Current UTC time truncated to whole seconds.
fn utc_now_seconds() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// Rows ordered newest first; rows sharing a timestamp keep reverse
/// insertion order.
fn newest_first<T>(rows: &[Stamped<T>]) -> Vec<&Stamped<T>> {
    let mut ordered: Vec<(usize, &Stamped<T>)> = rows.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| b.at.cmp(&a.at).then(ib.cmp(ia)));
    ordered.into_iter().map(|(_, row)| row).collect()
}

fn latest<T: Clone>(rows: &[Stamped<T>]) -> Option<T> {
    newest_first(rows).first().map(|row| row.value.clone())
}

fn distinct_timestamps<T>(rows: &[Stamped<T>]) -> Vec<NaiveDateTime> {
    let mut stamps: Vec<NaiveDateTime> = rows.iter().map(|row| row.at).collect();
    stamps.sort_unstable_by(|a, b| b.cmp(a));
    stamps.dedup();
    stamps
}

fn rows_at<T: Clone>(rows: &[Stamped<T>], at: NaiveDateTime) -> Vec<T> {
    rows.iter()
        .filter(|row| row.at == at)
        .map(|row| row.value.clone())
        .collect()
}

impl LocalRepository {
    /// Create a new empty local repository stamped with the UTC clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(utc_now_seconds))
    }

    /// Create a repository that takes row timestamps from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            healthy: Arc::new(RwLock::new(true)),
            clock,
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.write() = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        *self.data.write() = LocalData::default();
    }

    /// Get the number of activity rows stored.
    pub fn activity_count(&self) -> usize {
        self.data.read().activities.len()
    }

    /// Check if an activity with this name exists.
    pub fn has_activity(&self, name: &str) -> bool {
        self.data
            .read()
            .activities
            .iter()
            .any(|row| row.value.name == name)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !*self.healthy.read() {
            return Err(
                RepositoryError::connection("Store is not healthy").with_operation(operation),
            );
        }
        Ok(())
    }

    fn stamp<T>(&self, value: T) -> Stamped<T> {
        Stamped {
            at: (self.clock)(),
            value,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Activity Repository ====================

#[async_trait]
impl ActivityRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(*self.healthy.read())
    }

    async fn save_family_member(&self, name: &str) -> RepositoryResult<()> {
        self.check_health("save_family_member")?;
        let row = self.stamp(FamilyMember {
            name: name.to_string(),
        });
        self.data.write().family_members.push(row);
        Ok(())
    }

    async fn list_family_members(&self) -> RepositoryResult<Vec<FamilyMember>> {
        self.check_health("list_family_members")?;
        let data = self.data.read();
        Ok(newest_first(&data.family_members)
            .into_iter()
            .map(|row| row.value.clone())
            .collect())
    }

    async fn save_activity(&self, rule: &ActivityRule) -> RepositoryResult<()> {
        self.check_health("save_activity")?;
        let row = self.stamp(rule.clone());
        self.data.write().activities.push(row);
        Ok(())
    }

    async fn replace_activity(
        &self,
        old_name: &str,
        rule: &ActivityRule,
    ) -> RepositoryResult<usize> {
        self.check_health("replace_activity")?;
        let row = self.stamp(rule.clone());
        let mut data = self.data.write();
        let before = data.activities.len();
        data.activities.retain(|row| row.value.name != old_name);
        let removed = before - data.activities.len();
        data.activities.push(row);
        Ok(removed)
    }

    async fn delete_activity(&self, name: &str) -> RepositoryResult<usize> {
        self.check_health("delete_activity")?;
        let mut data = self.data.write();
        let before = data.activities.len();
        data.activities.retain(|row| row.value.name != name);
        Ok(before - data.activities.len())
    }

    async fn list_activities(&self) -> RepositoryResult<Vec<ActivityRule>> {
        self.check_health("list_activities")?;
        let data = self.data.read();
        Ok(newest_first(&data.activities)
            .into_iter()
            .map(|row| row.value.clone())
            .collect())
    }
}

// ==================== Plan Repository ====================

#[async_trait]
impl PlanRepository for LocalRepository {
    async fn save_meal_plan(&self, plan: &MealPlan) -> RepositoryResult<()> {
        self.check_health("save_meal_plan")?;
        let row = self.stamp(plan.clone());
        self.data.write().meal_plans.push(row);
        Ok(())
    }

    async fn latest_meal_plan(&self) -> RepositoryResult<Option<MealPlan>> {
        self.check_health("latest_meal_plan")?;
        Ok(latest(&self.data.read().meal_plans))
    }

    async fn save_shopping_list(&self, list: &ShoppingList) -> RepositoryResult<()> {
        self.check_health("save_shopping_list")?;
        let row = self.stamp(list.clone());
        self.data.write().shopping_lists.push(row);
        Ok(())
    }

    async fn latest_shopping_list(&self) -> RepositoryResult<Option<ShoppingList>> {
        self.check_health("latest_shopping_list")?;
        Ok(latest(&self.data.read().shopping_lists))
    }

    async fn save_schedule(&self, schedule: &[ScheduleEntry]) -> RepositoryResult<()> {
        self.check_health("save_schedule")?;
        let row = self.stamp(schedule.to_vec());
        self.data.write().schedules.push(row);
        Ok(())
    }

    async fn latest_schedule(&self) -> RepositoryResult<Option<Vec<ScheduleEntry>>> {
        self.check_health("latest_schedule")?;
        Ok(latest(&self.data.read().schedules))
    }
}

// ==================== History Repository ====================

#[async_trait]
impl HistoryRepository for LocalRepository {
    async fn timestamps(&self, entity: Entity) -> RepositoryResult<Vec<NaiveDateTime>> {
        self.check_health("timestamps")?;
        let data = self.data.read();
        Ok(match entity {
            Entity::FamilyMember => distinct_timestamps(&data.family_members),
            Entity::Activity => distinct_timestamps(&data.activities),
            Entity::MealPlan => distinct_timestamps(&data.meal_plans),
            Entity::ShoppingList => distinct_timestamps(&data.shopping_lists),
            Entity::Schedule => distinct_timestamps(&data.schedules),
        })
    }

    async fn snapshot(
        &self,
        entity: Entity,
        at: NaiveDateTime,
    ) -> RepositoryResult<Snapshot> {
        self.check_health("snapshot")?;
        let data = self.data.read();
        let snapshot = match entity {
            Entity::FamilyMember => {
                let names: Vec<String> = rows_at(&data.family_members, at)
                    .into_iter()
                    .map(|member| member.name)
                    .collect();
                (!names.is_empty()).then_some(Snapshot::FamilyMembers(names))
            }
            Entity::Activity => {
                let rules = rows_at(&data.activities, at);
                (!rules.is_empty()).then_some(Snapshot::Activities(rules))
            }
            Entity::MealPlan => rows_at(&data.meal_plans, at)
                .into_iter()
                .next()
                .map(Snapshot::MealPlan),
            Entity::ShoppingList => rows_at(&data.shopping_lists, at)
                .into_iter()
                .next()
                .map(Snapshot::ShoppingList),
            Entity::Schedule => rows_at(&data.schedules, at)
                .into_iter()
                .next()
                .map(Snapshot::Schedule),
        };
        snapshot.ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("no {} stored at that time", entity),
                ErrorContext::new("snapshot")
                    .with_entity(entity.to_string())
                    .with_entity_id(at.format(TIMESTAMP_FORMAT)),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityInput;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn ticking_clock() -> Clock {
        let base = NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let tick = Arc::new(AtomicI64::new(0));
        Arc::new(move || base + chrono::Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
    }

    fn rule(name: &str) -> ActivityRule {
        ActivityInput::new(name, "15:00", &["Monday"], "Field", "weekly", "Alice")
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_activities_listed_newest_first() {
        let repo = LocalRepository::with_clock(ticking_clock());
        repo.save_activity(&rule("Soccer")).await.unwrap();
        repo.save_activity(&rule("Piano")).await.unwrap();

        let names: Vec<_> = repo
            .list_activities()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Piano", "Soccer"]);
    }

    #[tokio::test]
    async fn test_replace_and_delete_by_name() {
        let repo = LocalRepository::new();
        repo.save_activity(&rule("Soccer")).await.unwrap();
        repo.save_activity(&rule("Soccer")).await.unwrap();

        let removed = repo.replace_activity("Soccer", &rule("Football")).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.has_activity("Football"));
        assert!(!repo.has_activity("Soccer"));

        assert_eq!(repo.delete_activity("Football").await.unwrap(), 1);
        assert_eq!(repo.delete_activity("Football").await.unwrap(), 0);
        assert_eq!(repo.activity_count(), 0);
    }

    #[tokio::test]
    async fn test_latest_plan_wins() {
        let repo = LocalRepository::with_clock(ticking_clock());
        assert!(repo.latest_meal_plan().await.unwrap().is_none());

        let mut list = ShoppingList::new();
        repo.save_shopping_list(&list).await.unwrap();
        list.push(crate::models::StoreSection::Dairy, "milk");
        repo.save_shopping_list(&list).await.unwrap();

        let latest = repo.latest_shopping_list().await.unwrap().unwrap();
        assert_eq!(latest.flat_items(), vec!["milk"]);
    }

    #[tokio::test]
    async fn test_snapshot_by_timestamp() {
        let repo = LocalRepository::with_clock(ticking_clock());
        repo.save_family_member("Alice").await.unwrap();
        repo.save_family_member("Bob").await.unwrap();

        let stamps = repo.timestamps(Entity::FamilyMember).await.unwrap();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[0] > stamps[1]);

        let oldest = repo
            .snapshot(Entity::FamilyMember, stamps[1])
            .await
            .unwrap();
        assert_eq!(oldest, Snapshot::FamilyMembers(vec!["Alice".to_string()]));

        let err = repo
            .snapshot(Entity::MealPlan, stamps[0])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity.as_deref(), Some("MealPlan"));
        assert_eq!(
            err.context().entity_id.as_deref(),
            Some("2025-06-09 08:00:01")
        );
    }

    #[tokio::test]
    async fn test_unhealthy_store_rejects_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.save_family_member("Alice").await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert!(err.is_retryable());

        repo.set_healthy(true);
        repo.save_family_member("Alice").await.unwrap();
        repo.clear();
        assert!(repo.list_family_members().await.unwrap().is_empty());
    }
}

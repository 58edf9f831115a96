//! Household data storage.
//!
//! This module provides abstractions for storage operations via the
//! Repository pattern, so the storage backend can be swapped without touching
//! the business logic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (command-line front end, tests)      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Household operations     │
//! │  - Role checks                                          │
//! │  - Activity validation and schedule regeneration        │
//! │  - Meal plan and shopping list orchestration            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use family_planner::db::{services, RepositoryFactory, RepositoryType};
//! use family_planner::models::Role;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
//!     services::add_family_member(repo.as_ref(), Role::Parent, "Alice")
//!         .await
//!         .unwrap();
//!     let state = services::load_state(repo.as_ref(), Role::Parent).await.unwrap();
//!     assert_eq!(state.family_members, vec!["Alice"]);
//! });
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

// ==================== Service Layer ====================

pub use services::{
    add_activity, add_family_member, delete_activity, driver_schedule, edit_activity,
    entity_timestamps, generate_meal_plan, health_check, load_snapshot, load_state, meal_plan,
    refresh_calendar, shopping_list_items, PlannedWeek, LATEST,
};

// ==================== Repository Pattern Exports ====================

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    ActivityRepository, Entity, ErrorContext, FullRepository, HistoryRepository, PlanRepository,
    RepositoryError, RepositoryResult, Snapshot,
};

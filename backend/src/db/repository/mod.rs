//! Repository trait definitions for the household store.
//!
//! Responsibilities are split across focused traits so an implementation can
//! be built and tested piece by piece:
//!
//! - [`error`]: Error types for repository operations
//! - [`activity`]: Family members and activity rules
//! - [`plan`]: Meal plans, shopping lists and the caregiver schedule
//! - [`history`]: Timestamped snapshots of every stored entity
//!
//! Every write inserts a timestamped row. "Current" data is the full set of
//! family members and activities, and the newest row for the other entities.

pub mod activity;
pub mod error;
pub mod history;
pub mod plan;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use activity::ActivityRepository;
pub use history::{Entity, HistoryRepository, Snapshot, TIMESTAMP_FORMAT};
pub use plan::PlanRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: ActivityRepository + PlanRepository + HistoryRepository {}

impl<T> FullRepository for T where T: ActivityRepository + PlanRepository + HistoryRepository {}

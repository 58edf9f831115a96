//! # Family Planner
//!
//! Household coordination engine: activity calendars and reminders, weekly
//! meal plans, shopping lists and caregiver schedules, with role-based access
//! for parents, cooks and drivers.
//!
//! ## Features
//!
//! - **Activity Scheduling**: Validate recurring activities and expand them
//!   into a weekday calendar plus dated reminders for a reference week
//! - **Meal Planning**: Weekly plans from a pluggable provider, with a
//!   deterministic fallback
//! - **Shopping Lists**: Deduplicated ingredients grouped by store section
//! - **Roles**: Parent, Cook and Driver views of the household data
//! - **History**: Timestamped snapshots of every stored entity
//!
//! ## Architecture
//!
//! - [`models`]: Activities, meals, shopping lists and household types
//! - [`scheduler`]: Pure calendar and reminder expansion
//! - [`services`]: Meal planning, shopping lists, projections and roles
//! - [`db`]: Repository pattern, in-memory store and household operations
//! - [`config`]: TOML configuration with environment overrides
//! - [`api`]: Consolidated public types

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;

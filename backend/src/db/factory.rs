//! Repository factory for creating the household store.
//!
//! Selects a backend from configuration or the environment and hands it out
//! behind `Arc<dyn FullRepository>` so callers never name the concrete type.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::PlannerConfig;

/// Available repository backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory store, lost when the process exits.
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(RepositoryType::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Read the backend from `REPOSITORY_TYPE`.
    ///
    /// An unset variable selects [`RepositoryType::Local`]; an unknown value
    /// is logged and also falls back to it.
    pub fn from_env() -> Self {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(value) => value.parse().unwrap_or_else(|err: String| {
                tracing::warn!("{}, using local repository", err);
                RepositoryType::Local
            }),
            Err(_) => RepositoryType::Local,
        }
    }
}

/// Factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository of the given type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from the `REPOSITORY_TYPE` environment variable.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::create(RepositoryType::from_env())
    }

    /// Create repository from a loaded planner configuration.
    pub fn from_config(config: &PlannerConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
                .with_operation("create_repository")
        })?;
        tracing::info!("Creating {:?} repository", repo_type);
        Self::create(repo_type)
    }
}

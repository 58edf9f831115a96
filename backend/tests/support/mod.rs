#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use family_planner::db::repositories::Clock;
use family_planner::db::LocalRepository;
use family_planner::models::ActivityInput;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with planner environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process-global environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Every variable the planner reads, cleared.
pub const CLEAN_ENV: [(&str, Option<&str>); 4] = [
    ("PLANNER_CONFIG", None),
    ("REPOSITORY_TYPE", None),
    ("PLANNER_REFERENCE_DATE", None),
    ("RUST_LOG", None),
];

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A repository whose rows are stamped one second apart from
/// 2025-06-09 08:00:00.
pub fn ticking_repository() -> LocalRepository {
    let base = NaiveDate::from_ymd_opt(2025, 6, 9)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let tick = Arc::new(AtomicI64::new(0));
    let clock: Clock =
        Arc::new(move || base + chrono::Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)));
    LocalRepository::with_clock(clock)
}

pub fn soccer_practice() -> ActivityInput {
    ActivityInput::new(
        "Soccer Practice",
        "15:00",
        &["Monday", "Wednesday"],
        "Community Field",
        "weekly",
        "Alice",
    )
}

pub fn art_class() -> ActivityInput {
    ActivityInput::new(
        "Art Class",
        "10:00",
        &["Saturday"],
        "Art Center",
        "monthly",
        "Bob",
    )
}

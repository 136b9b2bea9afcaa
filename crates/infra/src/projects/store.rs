//! Project (named forecast run) storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jawara_core::{DomainError, DomainResult};
use jawara_forecast::{ForecastRun, ProjectSummary};

/// Keyed store of forecast runs plus the "most recent run" pointer.
///
/// Mutations on a name are atomic: concurrent `create`s of the same name see
/// exactly one success, and `rename` never exposes a state where the run is
/// under both names or neither.
pub trait ProjectStore: Send + Sync {
    /// Persist `run` under `name` and return the stored copy.
    fn create(&self, name: &str, run: ForecastRun) -> DomainResult<ForecastRun>;

    /// Summaries, newest first.
    fn list(&self) -> Vec<ProjectSummary>;

    fn get(&self, name: &str) -> DomainResult<ForecastRun>;

    fn rename(&self, old_name: &str, new_name: &str) -> DomainResult<()>;

    fn delete(&self, name: &str) -> DomainResult<()>;

    /// The retained run with the greatest `created_at`, named or not.
    fn latest(&self) -> DomainResult<ForecastRun>;

    /// Retain an unnamed run solely so `latest()` can serve it.
    ///
    /// Only the unnamed run with the greatest `created_at` is kept; an older one is ignored.
    fn record_transient(&self, run: ForecastRun);

    /// Drop every retained run. Returns how many named projects were removed.
    fn clear(&self) -> usize;
}

/// Trimmed, non-empty project name.
pub fn normalize_name(name: &str) -> DomainResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_parameter("project name cannot be empty"));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone)]
struct Entry {
    /// Insertion order; breaks `created_at` ties.
    seq: u64,
    run: ForecastRun,
}

impl Entry {
    fn recency(&self) -> (chrono::DateTime<chrono::Utc>, u64) {
        (self.run.created_at, self.seq)
    }
}

#[derive(Debug, Default)]
struct State {
    named: HashMap<String, Entry>,
    transient: Option<Entry>,
    next_seq: u64,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// In-memory project store guarded by a single store-wide lock.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    inner: RwLock<State>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // Every write completes its mutation before releasing the guard, so a
    // poisoned lock still holds a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn create(&self, name: &str, mut run: ForecastRun) -> DomainResult<ForecastRun> {
        let name = normalize_name(name)?;
        let mut state = self.write();

        if state.named.contains_key(name) {
            return Err(DomainError::duplicate_name(format!("project '{name}' already exists")));
        }

        run.name = Some(name.to_string());
        let seq = state.next_seq();
        state.named.insert(name.to_string(), Entry { seq, run: run.clone() });
        Ok(run)
    }

    fn list(&self) -> Vec<ProjectSummary> {
        let state = self.read();
        let mut entries: Vec<(&String, &Entry)> = state.named.iter().collect();
        entries.sort_by(|a, b| b.1.recency().cmp(&a.1.recency()));
        entries
            .into_iter()
            .map(|(name, e)| ProjectSummary::of(name.clone(), &e.run))
            .collect()
    }

    fn get(&self, name: &str) -> DomainResult<ForecastRun> {
        let key = name.trim();
        self.read()
            .named
            .get(key)
            .map(|e| e.run.clone())
            .ok_or_else(|| DomainError::not_found(format!("project '{key}' not found")))
    }

    fn rename(&self, old_name: &str, new_name: &str) -> DomainResult<()> {
        let old_name = old_name.trim();
        let new_name = normalize_name(new_name)?;
        let mut state = self.write();

        if !state.named.contains_key(old_name) {
            return Err(DomainError::not_found(format!("project '{old_name}' not found")));
        }
        if old_name == new_name {
            return Ok(());
        }
        if state.named.contains_key(new_name) {
            return Err(DomainError::duplicate_name(format!(
                "project '{new_name}' already exists"
            )));
        }

        if let Some(mut entry) = state.named.remove(old_name) {
            entry.run.name = Some(new_name.to_string());
            state.named.insert(new_name.to_string(), entry);
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> DomainResult<()> {
        let key = name.trim();
        match self.write().named.remove(key) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(format!("project '{key}' not found"))),
        }
    }

    fn latest(&self) -> DomainResult<ForecastRun> {
        let state = self.read();
        state
            .named
            .values()
            .chain(state.transient.iter())
            .max_by_key(|e| e.recency())
            .map(|e| e.run.clone())
            .ok_or_else(|| DomainError::not_found("no forecast has been generated yet"))
    }

    fn record_transient(&self, mut run: ForecastRun) {
        run.name = None;
        let mut state = self.write();
        // Runs are stamped before the lock is taken, so arrival order may lag creation order.
        if let Some(current) = &state.transient {
            if run.created_at < current.run.created_at {
                return;
            }
        }
        let seq = state.next_seq();
        state.transient = Some(Entry { seq, run });
    }

    fn clear(&self) -> usize {
        let mut state = self.write();
        let removed = state.named.len();
        state.named.clear();
        state.transient = None;
        removed
    }
}

impl<S: ProjectStore + ?Sized> ProjectStore for Arc<S> {
    fn create(&self, name: &str, run: ForecastRun) -> DomainResult<ForecastRun> {
        (**self).create(name, run)
    }

    fn list(&self) -> Vec<ProjectSummary> {
        (**self).list()
    }

    fn get(&self, name: &str) -> DomainResult<ForecastRun> {
        (**self).get(name)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> DomainResult<()> {
        (**self).rename(old_name, new_name)
    }

    fn delete(&self, name: &str) -> DomainResult<()> {
        (**self).delete(name)
    }

    fn latest(&self) -> DomainResult<ForecastRun> {
        (**self).latest()
    }

    fn record_transient(&self, run: ForecastRun) {
        (**self).record_transient(run)
    }

    fn clear(&self) -> usize {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Barrier;

    use chrono::{DateTime, Duration, Utc};
    use jawara_auth::{Principal, Role};
    use jawara_core::{Alpha, ErrorKind};
    use jawara_forecast::CreatedBy;

    fn run_at(created_at: DateTime<Utc>, overall_mape: f64) -> ForecastRun {
        ForecastRun {
            name: None,
            created_at,
            created_by: CreatedBy::from(&Principal::with_role(Role::new("admin"))),
            alpha: Alpha::new(0.5).unwrap(),
            results: BTreeMap::new(),
            overall_mape,
            warnings: vec![],
        }
    }

    #[test]
    fn create_then_get() {
        let store = InMemoryProjectStore::new();
        let run = run_at(Utc::now(), 12.0);

        let stored = store.create("Q1", run.clone()).unwrap();
        assert_eq!(stored, run.clone().named("Q1"));
        assert_eq!(store.get("Q1").unwrap(), stored);
    }

    #[test]
    fn create_twice_is_duplicate() {
        let store = InMemoryProjectStore::new();
        store.create("Q1", run_at(Utc::now(), 1.0)).unwrap();
        let err = store.create("Q1", run_at(Utc::now(), 2.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        // First one wins.
        assert_eq!(store.get("Q1").unwrap().overall_mape, 1.0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let store = InMemoryProjectStore::new();
        let err = store.create("   ", run_at(Utc::now(), 1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn names_are_trimmed() {
        let store = InMemoryProjectStore::new();
        store.create("  Q1 ", run_at(Utc::now(), 1.0)).unwrap();
        assert_eq!(store.get("Q1").unwrap().name.as_deref(), Some("Q1"));
    }

    #[test]
    fn rename_moves_the_run() {
        let store = InMemoryProjectStore::new();
        let before = store.create("draft", run_at(Utc::now(), 3.0)).unwrap();

        store.rename("draft", "final").unwrap();

        assert_eq!(store.get("draft").unwrap_err().kind(), ErrorKind::NotFound);
        let after = store.get("final").unwrap();
        assert_eq!(after, before.named("final"));
    }

    #[test]
    fn rename_errors() {
        let store = InMemoryProjectStore::new();
        store.create("a", run_at(Utc::now(), 1.0)).unwrap();
        store.create("b", run_at(Utc::now(), 2.0)).unwrap();

        assert_eq!(store.rename("zzz", "c").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.rename("a", "b").unwrap_err().kind(), ErrorKind::DuplicateName);
        assert!(store.rename("a", "a").is_ok());
        assert_eq!(store.get("a").unwrap().overall_mape, 1.0);
    }

    #[test]
    fn delete_removes() {
        let store = InMemoryProjectStore::new();
        store.create("a", run_at(Utc::now(), 1.0)).unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.delete("a").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn list_is_newest_first() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.create("middle", run_at(t0, 2.0)).unwrap();
        store.create("oldest", run_at(t0 - Duration::hours(1), 1.0)).unwrap();
        store.create("newest", run_at(t0 + Duration::hours(1), 3.0)).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn latest_on_empty_store_is_not_found() {
        let store = InMemoryProjectStore::new();
        assert_eq!(store.latest().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn latest_includes_transient_runs() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.create("named", run_at(t0, 1.0)).unwrap();
        store.record_transient(run_at(t0 + Duration::seconds(1), 2.0));

        let latest = store.latest().unwrap();
        assert_eq!(latest.name, None);
        assert_eq!(latest.overall_mape, 2.0);

        // Transient runs are never listed nor retrievable by name.
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn latest_is_by_created_at_not_insertion() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.create("newer", run_at(t0, 1.0)).unwrap();
        store.record_transient(run_at(t0 - Duration::minutes(5), 2.0));
        assert_eq!(store.latest().unwrap().name.as_deref(), Some("newer"));
    }

    #[test]
    fn older_unnamed_run_does_not_replace_newer_one() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.record_transient(run_at(t0 + Duration::seconds(1), 2.0));
        store.record_transient(run_at(t0, 1.0));

        let latest = store.latest().unwrap();
        assert_eq!(latest.created_at, t0 + Duration::seconds(1));
        assert_eq!(latest.overall_mape, 2.0);

        // Same instant still replaces.
        store.record_transient(run_at(t0 + Duration::seconds(1), 3.0));
        assert_eq!(store.latest().unwrap().overall_mape, 3.0);
    }

    #[test]
    fn deleting_latest_falls_back_to_next_most_recent() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.record_transient(run_at(t0, 1.0));
        store.create("mid", run_at(t0 + Duration::seconds(1), 2.0)).unwrap();
        store.create("top", run_at(t0 + Duration::seconds(2), 3.0)).unwrap();

        store.delete("mid").unwrap();
        assert_eq!(store.latest().unwrap().name.as_deref(), Some("top"));

        store.delete("top").unwrap();
        let fallback = store.latest().unwrap();
        assert_eq!(fallback.name, None);
        assert_eq!(fallback.overall_mape, 1.0);
    }

    #[test]
    fn created_at_ties_go_to_later_insert() {
        let store = InMemoryProjectStore::new();
        let t0 = Utc::now();
        store.create("first", run_at(t0, 1.0)).unwrap();
        store.create("second", run_at(t0, 2.0)).unwrap();
        assert_eq!(store.latest().unwrap().name.as_deref(), Some("second"));

        // Rename keeps the original insertion order.
        store.rename("first", "renamed").unwrap();
        assert_eq!(store.latest().unwrap().name.as_deref(), Some("second"));
    }

    #[test]
    fn clear_drops_everything() {
        let store = InMemoryProjectStore::new();
        store.create("a", run_at(Utc::now(), 1.0)).unwrap();
        store.record_transient(run_at(Utc::now(), 2.0));
        assert_eq!(store.clear(), 1);
        assert!(store.list().is_empty());
        assert_eq!(store.latest().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn concurrent_creates_of_same_name_have_one_winner() {
        let store = InMemoryProjectStore::arc();
        let contenders = 8;
        let barrier = Barrier::new(contenders);

        let outcomes: Vec<DomainResult<ForecastRun>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..contenders)
                .map(|i| {
                    let store = store.clone();
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        store.create("race", run_at(Utc::now(), i as f64))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .all(|e| e.kind() == ErrorKind::DuplicateName));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn concurrent_renames_to_same_target_have_one_winner() {
        let store = InMemoryProjectStore::arc();
        let t0 = Utc::now();
        for i in 0..6 {
            store.create(&format!("src-{i}"), run_at(t0, i as f64)).unwrap();
        }
        let barrier = Barrier::new(6);

        let winners = std::thread::scope(|s| {
            let handles: Vec<_> = (0..6)
                .map(|i| {
                    let store = store.clone();
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        store.rename(&format!("src-{i}"), "target").is_ok()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count()
        });

        assert_eq!(winners, 1);
        assert_eq!(store.list().len(), 6);
        assert!(store.get("target").is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a create/rename/delete chain obeys the store laws.
            #[test]
            fn store_laws(a in "[a-z]{1,12}", b in "[A-Z]{1,12}", mape in 0.0f64..100.0) {
                let store = InMemoryProjectStore::new();
                let stored = store.create(&a, run_at(Utc::now(), mape)).unwrap();
                prop_assert_eq!(store.get(&a).unwrap(), stored.clone());

                store.rename(&a, &b).unwrap();
                prop_assert_eq!(store.get(&a).unwrap_err().kind(), ErrorKind::NotFound);
                prop_assert_eq!(store.get(&b).unwrap(), stored.named(b.clone()));

                store.delete(&b).unwrap();
                prop_assert_eq!(store.get(&b).unwrap_err().kind(), ErrorKind::NotFound);
            }
        }
    }
}

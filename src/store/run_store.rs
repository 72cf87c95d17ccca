//! Per-run claim storage
//!
//! Each run is an append-only sequence guarded by its own mutex. The
//! check that decides whether a claim may be appended runs while that
//! mutex is held, so concurrent branches of one workflow never observe a
//! torn prefix and never drop each other's claims.
//!
//! Lock order: run map, then a single run. The append path for an
//! existing run releases the map before taking the run lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::retention::RetentionPolicy;
use crate::claim::Claim;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Internal error: {0}")]
    Internal(String),
}

fn poisoned() -> StoreError {
    StoreError::Internal("Lock poisoned".into())
}

#[derive(Debug)]
struct RunLog {
    claims: Vec<Claim>,
    last_append: DateTime<Utc>,
    /// Creation sequence, for listing runs in arrival order
    seq: u64,
    /// Set when the run is removed from the map
    closed: bool,
}

/// What an accepted append did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Index of the claim within its run
    pub position: usize,
    /// The claim opened a new run
    pub created: bool,
    /// Runs dropped to honour `max_runs`
    pub evicted: Vec<String>,
}

/// Claims grouped by correlation identifier, in insertion order.
#[derive(Debug)]
pub struct RunStore {
    runs: RwLock<HashMap<String, Arc<Mutex<RunLog>>>>,
    retention: RetentionPolicy,
    next_seq: AtomicU64,
}

impl Default for RunStore {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

impl RunStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            retention,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// Appends the claim produced by `check`, creating the run if absent.
    ///
    /// `check` sees the run's claims stored so far and either returns the
    /// claim to append or rejects it. A rejection leaves the store
    /// untouched: no claim is added and no empty run is created.
    pub fn append_checked<F, E>(
        &self,
        correlation_id: &str,
        now: DateTime<Utc>,
        check: F,
    ) -> Result<AppendOutcome, E>
    where
        F: FnOnce(&[Claim]) -> Result<Claim, E>,
        E: From<StoreError>,
    {
        let mut check = Some(check);

        loop {
            let existing = {
                let runs = self.runs.read().map_err(|_| poisoned())?;
                runs.get(correlation_id).cloned()
            };

            if let Some(run) = existing {
                let mut log = run.lock().map_err(|_| poisoned())?;
                if log.closed {
                    // Evicted between lookup and lock; start over.
                    continue;
                }
                let check = check.take().ok_or_else(poisoned)?;
                let claim = check(log.claims.as_slice())?;
                log.claims.push(claim);
                log.last_append = now;
                return Ok(AppendOutcome {
                    position: log.claims.len() - 1,
                    created: false,
                    evicted: Vec::new(),
                });
            }

            let mut runs = self.runs.write().map_err(|_| poisoned())?;
            if runs.contains_key(correlation_id) {
                // Another writer created it first.
                continue;
            }

            let check = check.take().ok_or_else(poisoned)?;
            let claim = check(&[])?;

            let overflow = self.retention.overflow(runs.len());
            let evicted = Self::evict_oldest(&mut runs, overflow)?;
            let log = RunLog {
                claims: vec![claim],
                last_append: now,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                closed: false,
            };
            runs.insert(correlation_id.to_string(), Arc::new(Mutex::new(log)));

            return Ok(AppendOutcome {
                position: 0,
                created: true,
                evicted,
            });
        }
    }

    /// Appends without any check.
    pub fn append(
        &self,
        correlation_id: &str,
        claim: Claim,
        now: DateTime<Utc>,
    ) -> StoreResult<AppendOutcome> {
        self.append_checked(correlation_id, now, |_: &[Claim]| Ok::<_, StoreError>(claim))
    }

    /// The run's claims in insertion order; empty when the run is unknown.
    pub fn get(&self, correlation_id: &str) -> StoreResult<Vec<Claim>> {
        let run = {
            let runs = self.runs.read().map_err(|_| poisoned())?;
            match runs.get(correlation_id) {
                Some(run) => Arc::clone(run),
                None => return Ok(Vec::new()),
            }
        };
        let log = run.lock().map_err(|_| poisoned())?;
        Ok(log.claims.clone())
    }

    pub fn contains(&self, correlation_id: &str) -> bool {
        self.runs
            .read()
            .map(|runs| runs.contains_key(correlation_id))
            .unwrap_or(false)
    }

    /// Live run identifiers in creation order
    pub fn run_ids(&self) -> StoreResult<Vec<String>> {
        let runs = self.runs.read().map_err(|_| poisoned())?;
        let mut ids = Vec::with_capacity(runs.len());
        for (id, run) in runs.iter() {
            let seq = run.lock().map_err(|_| poisoned())?.seq;
            ids.push((seq, id.clone()));
        }
        ids.sort();
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    pub fn len(&self) -> usize {
        self.runs.read().map(|runs| runs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops a run. Returns whether it existed.
    pub fn remove(&self, correlation_id: &str) -> StoreResult<bool> {
        let mut runs = self.runs.write().map_err(|_| poisoned())?;
        match runs.remove(correlation_id) {
            Some(run) => {
                run.lock().map_err(|_| poisoned())?.closed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops every run idle past the retention TTL, returning their ids.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> StoreResult<Vec<String>> {
        if self.retention.idle_ttl.is_none() {
            return Ok(Vec::new());
        }

        let mut runs = self.runs.write().map_err(|_| poisoned())?;
        let mut expired = Vec::new();
        for (id, run) in runs.iter() {
            let log = run.lock().map_err(|_| poisoned())?;
            if self.retention.is_expired(log.last_append, now) {
                expired.push((log.seq, id.clone()));
            }
        }
        expired.sort();

        let mut evicted = Vec::with_capacity(expired.len());
        for (_, id) in expired {
            if let Some(run) = runs.remove(&id) {
                run.lock().map_err(|_| poisoned())?.closed = true;
            }
            evicted.push(id);
        }
        Ok(evicted)
    }

    /// Removes the `count` least recently appended-to runs.
    fn evict_oldest(
        runs: &mut HashMap<String, Arc<Mutex<RunLog>>>,
        count: usize,
    ) -> StoreResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut by_age = Vec::with_capacity(runs.len());
        for (id, run) in runs.iter() {
            let log = run.lock().map_err(|_| poisoned())?;
            by_age.push((log.last_append, log.seq, id.clone()));
        }
        by_age.sort();

        let mut evicted = Vec::with_capacity(count);
        for (_, _, id) in by_age.into_iter().take(count) {
            if let Some(run) = runs.remove(&id) {
                run.lock().map_err(|_| poisoned())?.closed = true;
            }
            evicted.push(id);
        }
        Ok(evicted)
    }
}

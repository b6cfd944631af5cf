//! Functional-equivalence cache: fingerprint of observed behavior -> fitness.
//!
//! Entries are write-once. A second insert with the same fitness is a no-op;
//! one with a different fitness means either the evaluator is not
//! deterministic or two behaviors collided, and is reported as
//! `CacheInconsistency` without touching the stored entry.
//!
//! Fingerprints only compare within one task. `bind_task` resets the cache
//! whenever the task signature changes, and every read or write names the
//! task it was computed under. Anything tagged with a task other than the
//! bound one is neither served nor stored.
//!
//! `get_or_insert_with` claims a fingerprint before computing it, so
//! concurrent workers never score the same fingerprint twice: the first
//! computes, the others wait for its entry.

use crate::error::{AmlzError, Result};
use crate::types::{Fingerprint, Fitness, TaskSignature};
use log::{debug, info};
use parking_lot::{Condvar, Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CachePolicy {
    /// Grow for the whole run.
    #[default]
    Unbounded,
    /// Keep at most `capacity` entries, evicting the least recently used.
    Lru { capacity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub resets: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    fitness: Fitness,
    last_used: u64,
}

/// A fingerprint some worker is computing right now.
#[derive(Debug, Default)]
struct InFlight {
    done: Mutex<bool>,
    finished: Condvar,
}

impl InFlight {
    fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.finished.wait(&mut done);
        }
    }

    fn finish(&self) {
        *self.done.lock() = true;
        self.finished.notify_all();
    }
}

type ClaimKey = (TaskSignature, Fingerprint);

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Fingerprint, CacheEntry>,
    // Only maintained under the LRU policy: last_used tick -> fingerprint.
    recency: BTreeMap<u64, Fingerprint>,
    tick: u64,
    task: Option<TaskSignature>,
    // Survives resets; each claim removes itself.
    in_flight: HashMap<ClaimKey, Arc<InFlight>>,
}

impl CacheState {
    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.tick = 0;
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn serves(&self, task: TaskSignature) -> bool {
        self.task == Some(task)
    }
}

/// Releases a claimed fingerprint when the owner is done, including when
/// its computation fails or panics. Waiters then re-check the cache.
struct Claim<'a> {
    cache: &'a FunctionalCache,
    key: ClaimKey,
    in_flight: Arc<InFlight>,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.cache.state.write().in_flight.remove(&self.key);
        self.in_flight.finish();
    }
}

/// Shared by every worker evaluating candidates of one task.
///
/// A single read-write lock guards the map. Unbounded lookups only take the
/// read side; LRU lookups write because they refresh recency. Statistics are
/// atomics so `stats` never blocks a worker for long.
#[derive(Debug)]
pub struct FunctionalCache {
    state: RwLock<CacheState>,
    policy: CachePolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    resets: AtomicU64,
}

impl FunctionalCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            resets: AtomicU64::new(0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(CachePolicy::Unbounded)
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Cached fitness of `fingerprint`, if the cache is bound to `task`.
    pub fn lookup(&self, task: TaskSignature, fingerprint: Fingerprint) -> Option<Fitness> {
        let found = self.find(task, fingerprint);
        if found.is_some() {
            self.record_hit(fingerprint);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Stores `fitness` for `fingerprint`. Ignored if the cache has since
    /// been bound to a task other than `task`.
    pub fn insert(&self, task: TaskSignature, fingerprint: Fingerprint, fitness: Fitness) -> Result<()> {
        let mut state = self.state.write();

        if !state.serves(task) {
            debug!(
                "Dropping {} computed under task {}, cache is bound to {:?}",
                fingerprint, task, state.task
            );
            return Ok(());
        }

        if let Some(existing) = state.entries.get(&fingerprint) {
            if existing.fitness.value().to_bits() == fitness.value().to_bits() {
                return Ok(());
            }
            return Err(AmlzError::CacheInconsistency {
                fingerprint: fingerprint.0,
                cached: existing.fitness.value(),
                attempted: fitness.value(),
            });
        }

        let tick = state.next_tick();
        if let CachePolicy::Lru { capacity } = self.policy {
            if capacity == 0 {
                return Ok(());
            }
            while state.entries.len() >= capacity {
                let Some((_, oldest)) = state.recency.pop_first() else {
                    break;
                };
                state.entries.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("Functional cache evicted {}", oldest);
            }
            state.recency.insert(tick, fingerprint);
        }
        state.entries.insert(
            fingerprint,
            CacheEntry {
                fitness,
                last_used: tick,
            },
        );
        self.inserts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Cached fitness of `fingerprint`, computing and storing it on a miss.
    ///
    /// At most one caller computes a given `(task, fingerprint)` at a time;
    /// concurrent callers block until that entry exists and then share it,
    /// exactly as if they had arrived after it was inserted. If `compute`
    /// fails, the error goes to its caller and a waiter takes over the claim.
    pub fn get_or_insert_with<C>(&self, task: TaskSignature, fingerprint: Fingerprint, compute: C) -> Result<Fitness>
    where
        C: FnOnce() -> Result<Fitness>,
    {
        let key = (task, fingerprint);
        let claim = loop {
            if let Some(fitness) = self.find(task, fingerprint) {
                self.record_hit(fingerprint);
                return Ok(fitness);
            }

            let mut state = self.state.write();
            if let Some(fitness) = self.find_locked(&mut state, task, fingerprint) {
                drop(state);
                self.record_hit(fingerprint);
                return Ok(fitness);
            }
            let pending = state.in_flight.get(&key).cloned();
            match pending {
                Some(pending) => {
                    drop(state);
                    pending.wait();
                }
                None => {
                    let in_flight = Arc::new(InFlight::default());
                    state.in_flight.insert(key, Arc::clone(&in_flight));
                    break Claim {
                        cache: self,
                        key,
                        in_flight,
                    };
                }
            }
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fitness = compute()?;
        self.insert(task, fingerprint, fitness)?;
        drop(claim);
        Ok(fitness)
    }

    /// Drops every entry. Statistics other than `size` keep accumulating.
    pub fn reset(&self) {
        let mut state = self.state.write();
        let dropped = state.entries.len();
        state.clear();
        drop(state);
        self.resets.fetch_add(1, Ordering::Relaxed);
        info!("Functional cache reset ({} entries dropped)", dropped);
    }

    /// Ties the cache to a task. Returns true if this cleared entries
    /// computed under a different task.
    pub fn bind_task(&self, task: TaskSignature) -> bool {
        if self.state.read().serves(task) {
            return false;
        }
        let mut state = self.state.write();
        match state.task {
            Some(current) if current == task => false,
            Some(previous) => {
                let dropped = state.entries.len();
                state.clear();
                state.task = Some(task);
                drop(state);
                self.resets.fetch_add(1, Ordering::Relaxed);
                info!(
                    "Task changed from {} to {}, functional cache reset ({} entries dropped)",
                    previous, task, dropped
                );
                true
            }
            None => {
                state.task = Some(task);
                false
            }
        }
    }

    pub fn task(&self) -> Option<TaskSignature> {
        self.state.read().task
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    fn find(&self, task: TaskSignature, fingerprint: Fingerprint) -> Option<Fitness> {
        match self.policy {
            CachePolicy::Unbounded => {
                let state = self.state.read();
                if !state.serves(task) {
                    return None;
                }
                state.entries.get(&fingerprint).map(|entry| entry.fitness)
            }
            CachePolicy::Lru { .. } => self.find_locked(&mut self.state.write(), task, fingerprint),
        }
    }

    fn find_locked(&self, state: &mut CacheState, task: TaskSignature, fingerprint: Fingerprint) -> Option<Fitness> {
        if !state.serves(task) {
            return None;
        }
        match self.policy {
            CachePolicy::Unbounded => state.entries.get(&fingerprint).map(|entry| entry.fitness),
            CachePolicy::Lru { .. } => {
                let tick = state.next_tick();
                let CacheState { entries, recency, .. } = state;
                entries.get_mut(&fingerprint).map(|entry| {
                    recency.remove(&entry.last_used);
                    recency.insert(tick, fingerprint);
                    entry.last_used = tick;
                    entry.fitness
                })
            }
        }
    }

    fn record_hit(&self, fingerprint: Fingerprint) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Functional cache hit for {}", fingerprint);
    }
}

impl Default for FunctionalCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

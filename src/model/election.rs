use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::warn;

use crate::analytics::plurality::{self, Standing, WinnerReport};
use crate::error::Result;

use super::ledger::Ledger;
use super::registry::Registry;
use super::vote::{EncryptedBallot, VoteRequest};

/// All election state: the registry and the ledger that references it.
#[derive(Debug, Clone, Default)]
pub struct Election {
    pub registry: Registry,
    pub ledger: Ledger,
}

impl Election {
    pub fn cast(&mut self, request: VoteRequest, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.ledger.cast(&self.registry, request, now)
    }

    pub fn cast_weighted(
        &mut self,
        request: VoteRequest,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        self.ledger.cast_weighted(&self.registry, request, now)
    }

    pub fn submit_encrypted(&mut self, ballot: EncryptedBallot) -> Result<usize> {
        self.ledger.submit_encrypted(&self.registry, ballot)
    }

    /// Totals for every registered candidate.
    pub fn totals(&self) -> IndexMap<String, f64> {
        plurality::totals(self.registry.candidate_ids(), self.ledger.votes())
    }

    pub fn leaderboard(&self) -> Vec<Standing> {
        plurality::rank(self.totals())
    }

    pub fn winner(&self) -> WinnerReport {
        plurality::winner(&self.leaderboard())
    }

    /// Forget every voter, candidate, vote and encrypted ballot.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.ledger.clear();
    }
}

/// Shared handle to the election state. Clones refer to the same state.
///
/// Every read and write goes through one exclusive lock, so operations are
/// atomic with respect to each other and aggregates never see a torn ledger.
#[derive(Debug, Clone, Default)]
pub struct ElectionStore {
    inner: Arc<Mutex<Election>>,
}

impl ElectionStore {
    pub fn new(election: Election) -> Self {
        Self {
            inner: Arc::new(Mutex::new(election)),
        }
    }

    /// Acquire the lock. Operations validate before they mutate, so state
    /// behind a poisoned lock is still consistent and is used as-is.
    pub fn lock(&self) -> MutexGuard<'_, Election> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Election state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` with shared access to the state.
    pub fn read<T>(&self, f: impl FnOnce(&Election) -> T) -> T {
        f(&*self.lock())
    }

    /// Run `f` with exclusive access to the state.
    pub fn write<T>(&self, f: impl FnOnce(&mut Election) -> T) -> T {
        f(&mut *self.lock())
    }
}

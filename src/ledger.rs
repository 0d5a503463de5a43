//! Recycling ledger: batches and reward balances behind a repository seam.
//!
//! `SqliteLedger` is the persistent backend. `InMemoryLedger` keeps the same
//! contract in a map and is meant for tests and demos.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;

use crate::db::{self, DatabaseError};
use crate::models::{BatchRecord, RewardBalance};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid ledger record: {0}")]
    Invalid(String),

    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

/// Storage contract for ledger records.
pub trait LedgerRepository: Send + Sync {
    fn get_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>, LedgerError>;

    /// Insert or replace a batch.
    fn put_batch(&self, batch: &BatchRecord) -> Result<(), LedgerError>;

    /// Batches recorded at a center, oldest first.
    fn batches_for_center(&self, center_id: &str) -> Result<Vec<BatchRecord>, LedgerError>;

    /// Balance of a profile; zero tokens if it was never stored.
    fn get_balance(&self, profile_id: &str) -> Result<RewardBalance, LedgerError>;

    /// Insert or replace a balance.
    fn put_balance(&self, balance: &RewardBalance) -> Result<(), LedgerError>;
}

fn validate_batch(batch: &BatchRecord) -> Result<(), LedgerError> {
    if batch.batch_id.trim().is_empty() {
        return Err(LedgerError::Invalid("batch id is empty".into()));
    }
    if batch.center_id.trim().is_empty() {
        return Err(LedgerError::Invalid(format!(
            "batch {} has no recycling center",
            batch.batch_id
        )));
    }
    if batch.weight_grams == 0 {
        return Err(LedgerError::Invalid(format!(
            "batch {} has zero weight",
            batch.batch_id
        )));
    }
    Ok(())
}

fn validate_balance(balance: &RewardBalance) -> Result<(), LedgerError> {
    if balance.profile_id.trim().is_empty() {
        return Err(LedgerError::Invalid("profile id is empty".into()));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// SQLite backend
// ═══════════════════════════════════════════════════════════

/// Ledger persisted in a SQLite database.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = db::open_database(path)?;
        tracing::debug!(path = %path.display(), "Ledger database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory SQLite ledger.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Mutex::new(db::open_memory_database()?),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(f(&*conn)?)
    }
}

impl LedgerRepository for SqliteLedger {
    fn get_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>, LedgerError> {
        self.with_conn(|conn| db::get_batch(conn, batch_id))
    }

    fn put_batch(&self, batch: &BatchRecord) -> Result<(), LedgerError> {
        validate_batch(batch)?;
        self.with_conn(|conn| db::upsert_batch(conn, batch))?;
        tracing::info!(batch_id = %batch.batch_id, status = %batch.status, "Batch stored");
        Ok(())
    }

    fn batches_for_center(&self, center_id: &str) -> Result<Vec<BatchRecord>, LedgerError> {
        self.with_conn(|conn| db::list_batches_by_center(conn, center_id))
    }

    fn get_balance(&self, profile_id: &str) -> Result<RewardBalance, LedgerError> {
        let stored = self.with_conn(|conn| db::get_balance(conn, profile_id))?;
        Ok(stored.unwrap_or_else(|| RewardBalance::empty(profile_id)))
    }

    fn put_balance(&self, balance: &RewardBalance) -> Result<(), LedgerError> {
        validate_balance(balance)?;
        self.with_conn(|conn| db::upsert_balance(conn, balance))?;
        tracing::info!(profile_id = %balance.profile_id, tokens = balance.tokens, "Balance stored");
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory test double
// ═══════════════════════════════════════════════════════════

/// Map-backed ledger with the same contract as `SqliteLedger`.
#[derive(Default)]
pub struct InMemoryLedger {
    batches: Mutex<HashMap<String, BatchRecord>>,
    balances: Mutex<HashMap<String, RewardBalance>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepository for InMemoryLedger {
    fn get_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>, LedgerError> {
        let batches = self.batches.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(batches.get(batch_id).cloned())
    }

    fn put_batch(&self, batch: &BatchRecord) -> Result<(), LedgerError> {
        validate_batch(batch)?;
        let mut batches = self.batches.lock().map_err(|_| LedgerError::LockPoisoned)?;
        batches.insert(batch.batch_id.clone(), batch.clone());
        Ok(())
    }

    fn batches_for_center(&self, center_id: &str) -> Result<Vec<BatchRecord>, LedgerError> {
        let batches = self.batches.lock().map_err(|_| LedgerError::LockPoisoned)?;
        let mut found: Vec<BatchRecord> = batches
            .values()
            .filter(|b| b.center_id == center_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.batch_id.cmp(&b.batch_id))
        });
        Ok(found)
    }

    fn get_balance(&self, profile_id: &str) -> Result<RewardBalance, LedgerError> {
        let balances = self.balances.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(balances
            .get(profile_id)
            .cloned()
            .unwrap_or_else(|| RewardBalance::empty(profile_id)))
    }

    fn put_balance(&self, balance: &RewardBalance) -> Result<(), LedgerError> {
        validate_balance(balance)?;
        let mut balances = self.balances.lock().map_err(|_| LedgerError::LockPoisoned)?;
        balances.insert(balance.profile_id.clone(), balance.clone());
        Ok(())
    }
}

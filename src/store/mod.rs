//! Run storage subsystem
//!
//! A run is created implicitly by its first claim and is never closed by
//! the claims themselves; memory is bounded only by the retention policy
//! or by explicit removal.

mod retention;
mod run_store;

pub use retention::RetentionPolicy;
pub use run_store::{AppendOutcome, RunStore, StoreError, StoreResult};

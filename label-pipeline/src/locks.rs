//! Per-printer job serialization
//!
//! Two jobs written to the same printer at once can interleave on the device
//! and ruin both labels. Jobs to one address therefore take turns; jobs to
//! different printers do not wait for each other.

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async lock per printer address
///
/// Owned by one executor; clones share the same locks.
#[derive(Debug, Clone, Default)]
pub struct TargetLocks {
    locks: Arc<DashMap<SocketAddr, Arc<Mutex<()>>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of a printer
    ///
    /// The turn ends when the guard is dropped.
    pub async fn acquire(&self, addr: SocketAddr) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await
        let lock = self.locks.entry(addr).or_default().clone();
        lock.lock_owned().await
    }

    /// Number of printers seen so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

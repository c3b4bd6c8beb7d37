//! # Nonce Lock Pool
//!
//! Serializes "next nonce" reads per `(address, network client)` pair. The
//! lock protects only the read of the reserved nonce, never the network
//! submission itself; holders drop the guard before any relay call.
//!
//! The guard is RAII: it releases on every exit path, including panics and
//! early `?` returns, so a failed publish attempt can never wedge nonce
//! reads for its account.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

use wallet_types::{Address, NetworkClientId};

/// Pool of per-account async nonce locks.
///
/// Locks are created lazily on first acquisition and live for the pool's
/// lifetime; the key space is bounded by the accounts actually publishing.
#[derive(Default)]
pub struct NonceLockPool {
    locks: Mutex<HashMap<(Address, NetworkClientId), Arc<AsyncMutex<()>>>>,
}

/// Held while reading the reserved nonce. Releases on drop.
pub struct NonceGuard {
    _guard: OwnedMutexGuard<()>,
}

impl NonceLockPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the nonce lock for `(address, network_client_id)`, waiting if
    /// another publish attempt for the same account holds it.
    pub async fn acquire(&self, address: &Address, network_client_id: &NetworkClientId) -> NonceGuard {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(
                locks
                    .entry((address.clone(), network_client_id.clone()))
                    .or_default(),
            )
        };
        trace!(%address, %network_client_id, "Acquiring nonce lock");
        NonceGuard {
            _guard: lock.lock_owned().await,
        }
    }
}

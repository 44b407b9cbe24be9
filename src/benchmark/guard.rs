//! Per-sender run serialization.
//!
//! Two runs against the same account would race on its nonce and balance.
//! Runs for one sender therefore queue behind a shared async mutex.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async lock per sender address.
#[derive(Debug, Default)]
pub struct SenderLocks {
    locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other run holds `sender`, then hold it until the guard drops.
    pub async fn acquire(&self, sender: Address) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(sender)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        if lock.try_lock().is_err() {
            tracing::info!(sender = %sender, "Run already in progress for sender, queueing");
        }
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_sender_is_serialized() {
        let locks = Arc::new(SenderLocks::new());
        let sender = Address::repeat_byte(0x42);

        let guard = locks.acquire(sender).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(sender).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();

        // Free again once the waiter is done.
        tokio::time::timeout(Duration::from_millis(100), locks.acquire(sender))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_senders_do_not_block() {
        let locks = SenderLocks::new();
        let _a = locks.acquire(Address::repeat_byte(0x01)).await;

        let b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(Address::repeat_byte(0x02)),
        )
        .await;
        assert!(b.is_ok());
    }
}

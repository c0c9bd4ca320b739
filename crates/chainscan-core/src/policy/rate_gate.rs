//! Single-slot pacing gate.
//!
//! At most one [`GatePermit`] is outstanding at a time. A new permit is
//! handed out only after the previous one has been released and
//! `min_interval` has elapsed since that release. Waiters are served in
//! arrival order (`tokio::sync::Mutex` is FIFO).
//!
//! Dropping the permit is the release: it stamps the release time and wakes
//! the next waiter, so the gate is freed on every exit path of the caller.
//!
//! A disabled gate hands out permits immediately and records nothing.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::ApiKey;
use crate::error::ScanError;

/// Spacing for keyed clients (5 requests/second).
pub const KEYED_INTERVAL: Duration = Duration::from_millis(200);

/// Spacing for anonymous clients (1 request per 5 seconds).
pub const UNKEYED_INTERVAL: Duration = Duration::from_secs(5);

/// Mutual-exclusion pacing gate owned by one client instance.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    /// Time of the last release. `None` inside the mutex means no request
    /// has completed yet; `None` outside means pacing is disabled.
    slot: Option<Mutex<Option<Instant>>>,
}

impl RateGate {
    pub fn new(min_interval: Duration, enabled: bool) -> Self {
        Self {
            min_interval,
            slot: enabled.then(|| Mutex::new(None)),
        }
    }

    /// Gate sized for the tier the key belongs to.
    pub fn for_key(key: &ApiKey, enabled: bool) -> Self {
        Self::new(Self::interval_for(key), enabled)
    }

    /// Minimum spacing for the given key's tier.
    pub fn interval_for(key: &ApiKey) -> Duration {
        if key.is_set() {
            KEYED_INTERVAL
        } else {
            UNKEYED_INTERVAL
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn is_enabled(&self) -> bool {
        self.slot.is_some()
    }

    /// Wait for the gate.
    ///
    /// Returns [`ScanError::Cancelled`] if `cancel` fires before the permit
    /// is granted. A cancelled acquisition leaves the last release time
    /// untouched.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<GatePermit<'_>, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let Some(slot) = &self.slot else {
            return Ok(GatePermit { guard: None });
        };

        let guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ScanError::Cancelled),
            guard = slot.lock() => guard,
        };

        if let Some(last_release) = *guard {
            let ready_at = last_release + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tracing::debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "pacing: waiting before next request"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ScanError::Cancelled),
                    _ = tokio::time::sleep_until(ready_at) => {}
                }
            }
        }

        Ok(GatePermit { guard: Some(guard) })
    }
}

/// Exclusive right to issue one request. Released on drop.
#[derive(Debug)]
pub struct GatePermit<'a> {
    guard: Option<MutexGuard<'a, Option<Instant>>>,
}

impl GatePermit<'_> {
    /// Release the gate now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.as_mut() {
            **guard = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn interval_depends_on_key_tier() {
        assert_eq!(RateGate::interval_for(&ApiKey::Unset), Duration::from_secs(5));
        assert_eq!(RateGate::interval_for(&ApiKey::from("YourApiKeyToken")), Duration::from_secs(5));
        assert_eq!(RateGate::interval_for(&ApiKey::from("ABC")), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let gate = RateGate::new(Duration::from_secs(5), true);
        let start = Instant::now();
        let permit = gate.acquire(&CancellationToken::new()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        permit.release();
    }

    #[tokio::test(start_paused = true)]
    async fn next_acquire_waits_out_interval() {
        let gate = RateGate::new(Duration::from_millis(200), true);
        let cancel = CancellationToken::new();

        gate.acquire(&cancel).await.unwrap().release();
        let released = Instant::now();

        let _permit = gate.acquire(&cancel).await.unwrap();
        assert!(released.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_once_interval_has_passed() {
        let gate = RateGate::new(Duration::from_millis(200), true);
        let cancel = CancellationToken::new();

        gate.acquire(&cancel).await.unwrap().release();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let before = Instant::now();
        let _permit = gate.acquire(&cancel).await.unwrap();
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_waiting_for_lock() {
        let gate = Arc::new(RateGate::new(Duration::from_millis(200), true));
        let cancel = CancellationToken::new();
        let held = gate.acquire(&cancel).await.unwrap();

        let waiter_cancel = CancellationToken::new();
        let waiter = {
            let gate = gate.clone();
            let token = waiter_cancel.clone();
            tokio::spawn(async move { gate.acquire(&token).await.map(|_| ()) })
        };
        tokio::task::yield_now().await;
        waiter_cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(ScanError::Cancelled)));

        // The gate still works for the next caller.
        held.release();
        assert!(gate.acquire(&cancel).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_interval_sleep_keeps_last_release() {
        let gate = Arc::new(RateGate::new(Duration::from_secs(5), true));
        let cancel = CancellationToken::new();

        gate.acquire(&cancel).await.unwrap().release();
        let released = Instant::now();

        let sleeper_cancel = CancellationToken::new();
        let sleeper = {
            let gate = gate.clone();
            let token = sleeper_cancel.clone();
            tokio::spawn(async move { gate.acquire(&token).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        sleeper_cancel.cancel();
        assert!(matches!(sleeper.await.unwrap(), Err(ScanError::Cancelled)));

        // Next permit is due 5s after the first release, not after the cancel.
        let _permit = gate.acquire(&cancel).await.unwrap();
        let waited = released.elapsed();
        assert!(waited >= Duration::from_secs(5));
        assert!(waited < Duration::from_secs(6), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_is_rejected() {
        let gate = RateGate::new(Duration::from_millis(200), false);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(gate.acquire(&cancel).await, Err(ScanError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_gate_hands_out_concurrent_permits() {
        let gate = RateGate::new(Duration::from_secs(5), false);
        let cancel = CancellationToken::new();
        assert!(!gate.is_enabled());

        let a = gate.acquire(&cancel).await.unwrap();
        let start = Instant::now();
        let b = gate.acquire(&cancel).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        drop((a, b));
    }

    #[tokio::test(start_paused = true)]
    async fn waiters_are_served_in_arrival_order() {
        let gate = Arc::new(RateGate::new(Duration::from_millis(200), true));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let held = gate.acquire(&CancellationToken::new()).await.unwrap();

        let mut handles = Vec::new();
        for id in 0..3 {
            let gate = gate.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire(&CancellationToken::new()).await.unwrap();
                order.lock().unwrap().push(id);
            }));
            // Let the task queue on the lock before spawning the next one.
            tokio::task::yield_now().await;
        }

        held.release();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}

//! Server-wide cap on concurrently served connections.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ConnectionLimiter {
    active: Arc<AtomicUsize>,
    max: usize,
}

impl ConnectionLimiter {
    pub fn new(max: usize) -> Self {
        ConnectionLimiter {
            active: Arc::new(AtomicUsize::new(0)),
            max,
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Claim a slot, or `None` when `max` connections are already active.
    /// The slot is released when the returned permit is dropped.
    pub fn try_acquire(&self) -> Option<ConnectionPermit> {
        self.active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < self.max).then_some(count + 1)
            })
            .ok()?;
        Some(ConnectionPermit {
            active: self.active.clone(),
        })
    }
}

#[derive(Debug)]
pub struct ConnectionPermit {
    active: Arc<AtomicUsize>,
}

impl ConnectionPermit {
    /// Active connections including this one.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleventh_connection_is_rejected_at_limit_of_ten() {
        let limiter = ConnectionLimiter::new(10);

        let permits: Vec<_> = (0..10).filter_map(|_| limiter.try_acquire()).collect();
        assert_eq!(permits.len(), 10);
        assert!(limiter.try_acquire().is_none());
        assert_eq!(limiter.active(), 10);
    }

    #[test]
    fn dropping_a_permit_frees_a_slot() {
        let limiter = ConnectionLimiter::new(1);
        let permit = limiter.try_acquire().expect("first slot");
        assert!(limiter.try_acquire().is_none());

        drop(permit);
        assert_eq!(limiter.active(), 0);
        assert!(limiter.try_acquire().is_some());
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let limiter = ConnectionLimiter::new(0);
        assert!(limiter.try_acquire().is_none());
        assert_eq!(limiter.active(), 0);
    }

    #[test]
    fn concurrent_acquires_never_exceed_the_limit() {
        let limiter = ConnectionLimiter::new(4);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.try_acquire())
            })
            .collect();
        let granted: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(granted.len(), 4);
        assert_eq!(limiter.active(), 4);
    }
}

//! Exactly-once delivery of a request's outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Atomic guard ensuring a request resolves at most once.
///
/// Transports have been observed delivering the same response callback more
/// than once, so the claim is a compare-and-set rather than a plain flag:
/// it stays correct even when duplicates arrive concurrently.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    resolved: AtomicBool,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self {
            resolved: AtomicBool::new(false),
        }
    }

    /// Claim the latch. Returns `true` for exactly one caller.
    pub fn try_claim(&self) -> bool {
        self.resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }
}

type Continuation<T> = Box<dyn FnOnce(T) + Send>;

/// The two continuations of an in-flight request, behind a shared latch.
///
/// Whichever of [`succeed`](Completion::succeed) / [`fail`](Completion::fail)
/// claims the latch first consumes its continuation; every later attempt on
/// either channel is a no-op returning `false`.
pub struct Completion<S, F> {
    latch: CompletionLatch,
    on_success: Mutex<Option<Continuation<S>>>,
    on_failure: Mutex<Option<Continuation<F>>>,
}

impl<S, F> Completion<S, F> {
    pub fn new(
        on_success: impl FnOnce(S) + Send + 'static,
        on_failure: impl FnOnce(F) + Send + 'static,
    ) -> Self {
        Self {
            latch: CompletionLatch::new(),
            on_success: Mutex::new(Some(Box::new(on_success))),
            on_failure: Mutex::new(Some(Box::new(on_failure))),
        }
    }

    /// Deliver the success value. Returns `true` if this call resolved the
    /// request.
    pub fn succeed(&self, value: S) -> bool {
        if !self.latch.try_claim() {
            return false;
        }
        match take(&self.on_success) {
            Some(continuation) => {
                continuation(value);
                true
            }
            None => false,
        }
    }

    /// Deliver the failure value. Returns `true` if this call resolved the
    /// request.
    pub fn fail(&self, value: F) -> bool {
        if !self.latch.try_claim() {
            return false;
        }
        match take(&self.on_failure) {
            Some(continuation) => {
                continuation(value);
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.latch.is_resolved()
    }
}

fn take<T>(slot: &Mutex<Option<Continuation<T>>>) -> Option<Continuation<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_latch_claims_once() {
        let latch = CompletionLatch::new();
        assert!(!latch.is_resolved());
        assert!(latch.try_claim());
        assert!(!latch.try_claim());
        assert!(latch.is_resolved());
    }

    #[test]
    fn test_success_delivers_value() {
        let delivered = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&delivered);
        let completion = Completion::new(
            move |value: i32| *slot.lock().unwrap() = Some(value),
            |_: String| panic!("failure channel must not fire"),
        );

        assert!(completion.succeed(7));
        assert_eq!(*delivered.lock().unwrap(), Some(7));
    }

    #[test]
    fn test_second_success_is_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let completion = Completion::new(
            move |_: i32| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |_: String| panic!("failure channel must not fire"),
        );

        assert!(completion.succeed(1));
        assert!(!completion.succeed(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_after_success_is_dropped() {
        let completion = Completion::new(|_: i32| {}, |_: String| panic!("must not fire"));
        assert!(completion.succeed(1));
        assert!(!completion.fail("late".to_string()));
    }

    #[test]
    fn test_concurrent_duplicate_delivery_fires_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let completion = Arc::new(Completion::new(
            move |_: i32| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |_: String| panic!("failure channel must not fire"),
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let completion = Arc::clone(&completion);
                std::thread::spawn(move || completion.succeed(i))
            })
            .collect();

        let resolved = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|delivered| *delivered)
            .count();

        assert_eq!(resolved, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_success_and_failure_fire_once_total() {
        let calls = Arc::new(AtomicUsize::new(0));
        let success_counter = Arc::clone(&calls);
        let failure_counter = Arc::clone(&calls);
        let completion = Arc::new(Completion::new(
            move |_: i32| {
                success_counter.fetch_add(1, Ordering::SeqCst);
            },
            move |_: String| {
                failure_counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let succeeding = {
            let completion = Arc::clone(&completion);
            std::thread::spawn(move || completion.succeed(1))
        };
        let failing = {
            let completion = Arc::clone(&completion);
            std::thread::spawn(move || completion.fail("boom".to_string()))
        };

        let outcomes = [succeeding.join().unwrap(), failing.join().unwrap()];
        assert_eq!(outcomes.iter().filter(|delivered| **delivered).count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

//! Network reachability probing.

/// Reports whether the network is currently reachable.
///
/// Consulted before every request, with no caching in between; when the
/// probe says unreachable the dispatcher short-circuits locally and the
/// transport is never contacted. Platform probes plug in here; the default
/// [`AlwaysReachable`] defers entirely to the transport's own failures.
pub trait Reachability: Send + Sync {
    fn is_reachable(&self) -> bool;
}

/// Probe that always reports a reachable network.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

impl Reachability for AlwaysReachable {
    fn is_reachable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_always_reachable() {
        assert!(AlwaysReachable.is_reachable());
    }

    #[test]
    fn test_probe_is_object_safe() {
        struct Toggle(AtomicBool);

        impl Reachability for Toggle {
            fn is_reachable(&self) -> bool {
                self.0.load(Ordering::Relaxed)
            }
        }

        let probe: Box<dyn Reachability> = Box::new(Toggle(AtomicBool::new(false)));
        assert!(!probe.is_reachable());
    }
}

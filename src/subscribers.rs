//! Transition subscribers.
//!
//! Callbacks registered here are invoked on every connection-status
//! transition, in registration order. A panicking callback is logged and
//! skipped; it can never abort the remaining callbacks or the scheduler.
//!
//! Delivery works on a snapshot of the registration list, so callbacks run
//! outside the registry lock and may themselves subscribe or unsubscribe.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

/// Called with the new reachability on every status transition.
pub(crate) type Subscriber = Arc<dyn Fn(bool) + Send + Sync>;

/// Opaque handle returned by `subscribe`, usable for later removal.
///
/// Ids are allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    entries: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl SubscriberRegistry {
    pub(crate) fn register(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    /// Returns `false` when the id was already removed or never issued.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Ordered copy of the current registrations for lock-free delivery.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriptionId, Subscriber)> {
        self.entries.clone()
    }

    /// Invoke a snapshot of subscribers in registration order.
    ///
    /// A panic in one callback is contained and reported; the remaining
    /// callbacks still run.
    pub(crate) fn notify(entries: &[(SubscriptionId, Subscriber)], connected: bool) {
        for (id, subscriber) in entries {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| subscriber(connected))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".into());
                error!(subscription = id.0, %reason, "Subscriber callback panicked");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(log: &Arc<Mutex<Vec<(u8, bool)>>>, tag: u8) -> Subscriber {
        let log = Arc::clone(log);
        Arc::new(move |connected| log.lock().unwrap().push((tag, connected)))
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriberRegistry::default();
        registry.register(recording(&log, 0));
        registry.register(recording(&log, 1));
        registry.register(recording(&log, 2));

        SubscriberRegistry::notify(&registry.snapshot(), true);

        assert_eq!(*log.lock().unwrap(), vec![(0, true), (1, true), (2, true)]);
    }

    #[test]
    fn panicking_subscriber_does_not_starve_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriberRegistry::default();
        registry.register(recording(&log, 0));
        registry.register(Arc::new(|_: bool| panic!("subscriber bug")));
        registry.register(recording(&log, 1));

        SubscriberRegistry::notify(&registry.snapshot(), false);

        assert_eq!(*log.lock().unwrap(), vec![(0, false), (1, false)]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registrant() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriberRegistry::default();
        let first = registry.register(recording(&log, 0));
        registry.register(recording(&log, 1));

        assert!(registry.unsubscribe(first));
        assert!(!registry.unsubscribe(first));
        assert_eq!(registry.len(), 1);

        SubscriberRegistry::notify(&registry.snapshot(), true);
        assert_eq!(*log.lock().unwrap(), vec![(1, true)]);
    }

    #[test]
    fn duplicate_callbacks_are_kept_separately() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriberRegistry::default();
        let a = registry.register(recording(&log, 7));
        let b = registry.register(recording(&log, 7));
        assert_ne!(a, b);

        SubscriberRegistry::notify(&registry.snapshot(), true);
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}

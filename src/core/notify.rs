//! Settings-changed subscription registry.
//!
//! An explicit registry object rather than ambient global state: the engine
//! owns one [`ChangeNotifier`] and fires it after every successful save that
//! wrote at least one field. Subscribers run synchronously on the saving
//! thread, in registration order. A panicking subscriber is isolated and
//! logged so the rest still run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, Weak};
use tracing::warn;

struct Subscriber {
    id: u64,
    callback: Box<dyn Fn() + Send + Sync>,
}

#[derive(Default)]
struct Registry {
    subscribers: Vec<Arc<Subscriber>>,
    next_id: u64,
}

/// Multi-subscriber, zero-payload change event.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it stays registered until the returned handle is
    /// cancelled or the notifier is dropped.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut registry = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push(Arc::new(Subscriber {
            id,
            callback: Box::new(callback),
        }));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.subscribers.len(),
            Err(poisoned) => poisoned.into_inner().subscribers.len(),
        }
    }

    /// Invoke every subscriber, registration order, on the current thread.
    ///
    /// The subscriber list is snapshotted first, so callbacks may subscribe
    /// or cancel without deadlocking; such changes take effect on the next
    /// firing.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Arc<Subscriber>> = {
            let registry = match self.inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            registry.subscribers.clone()
        };
        for subscriber in snapshot {
            if catch_unwind(AssertUnwindSafe(|| (subscriber.callback)())).is_err() {
                warn!(subscriber = subscriber.id, "settings-change subscriber panicked");
            }
        }
    }
}

/// Cancellation handle returned by [`ChangeNotifier::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Deregister the callback. No-op if the notifier is already gone.
    pub fn cancel(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = match registry.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            registry.subscribers.retain(|s| s.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribers_fire_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = notifier.subscribe(move || first.lock().unwrap().push("first"));
        let second = Arc::clone(&order);
        let _b = notifier.subscribe(move || second.lock().unwrap().push("second"));

        notifier.notify();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn cancelled_subscription_stops_delivery() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let subscription = notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify();
        subscription.cancel();
        notifier.notify();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn panicking_subscriber_does_not_starve_later_ones() {
        let notifier = ChangeNotifier::new();
        let _panicker = notifier.subscribe(|| panic!("subscriber misbehaved"));

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let _survivor = notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_one_subscriber_list() {
        let notifier = ChangeNotifier::new();
        let clone = notifier.clone();

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let _sub = clone.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}

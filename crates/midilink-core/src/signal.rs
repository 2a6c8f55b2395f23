//! Emit/subscribe primitive for session events.
//!
//! A [`Signal`] owns a listener list; [`Signal::connect`] returns a
//! [`Subscription`] token and dropping the token unregisters the listener.
//! Emission runs synchronously on the caller's thread -- the hosting event
//! loop is expected to serialize callbacks for a given object.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::{Arc, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T: ?Sized> {
    next_key: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Multicast event source with RAII unsubscription.
pub struct Signal<T: ?Sized> {
    inner: Arc<Mutex<Listeners<T>>>,
}

impl<T: ?Sized + 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Listeners {
                next_key: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays live until the returned token drops.
    #[must_use = "dropping the Subscription immediately unregisters the listener"]
    pub fn connect(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let key = {
            let mut inner = self.inner.lock();
            let key = inner.next_key;
            inner.next_key += 1;
            inner.entries.push((key, Arc::new(callback)));
            key
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().entries.retain(|(k, _)| *k != key);
                }
            })),
        }
    }

    /// Invoke every live listener with `value`, in registration order.
    ///
    /// The listener set is snapshotted before the calls, so a callback may
    /// freely (un)subscribe on this same signal without deadlocking.
    pub fn emit(&self, value: &T) {
        let listeners: SmallVec<[Listener<T>; 4]> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in listeners {
            callback(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

impl<T: ?Sized + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration token returned by [`Signal::connect`].
///
/// Dropping it removes the listener; this never fails, even if the signal
/// itself is already gone.
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_listener() {
        let signal: Signal<u32> = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _sub = signal.connect(move |value| seen_clone.lock().push(*value));

        signal.emit(&1);
        signal.emit(&2);

        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_listeners_called_in_registration_order() {
        let signal: Signal<()> = Signal::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_a = Arc::clone(&order);
        let _a = signal.connect(move |_| order_a.lock().push("a"));
        let order_b = Arc::clone(&order);
        let _b = signal.connect(move |_| order_b.lock().push("b"));

        signal.emit(&());
        assert_eq!(*order.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let signal: Signal<u32> = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let sub = signal.connect(move |value| seen_clone.lock().push(*value));
        signal.emit(&1);

        drop(sub);
        signal.emit(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_emit_with_no_listeners_is_fine() {
        let signal: Signal<u32> = Signal::new();
        signal.emit(&99);
    }

    #[test]
    fn test_unsized_payload() {
        let signal: Signal<[u8]> = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _sub = signal.connect(move |bytes: &[u8]| seen_clone.lock().push(bytes.to_vec()));

        signal.emit(&[0x90, 0x3C, 0x7F]);
        assert_eq!(*seen.lock(), vec![vec![0x90, 0x3C, 0x7F]]);
    }

    #[test]
    fn test_subscription_outliving_signal_is_fine() {
        let signal: Signal<u32> = Signal::new();
        let sub = signal.connect(|_| {});
        drop(signal);
        drop(sub);
    }

    #[test]
    fn test_unsubscribe_during_emit_does_not_deadlock() {
        let signal: Arc<Signal<u32>> = Arc::new(Signal::new());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot_clone = Arc::clone(&slot);
        let sub = signal.connect(move |_| {
            // Drop our own registration from inside the callback.
            slot_clone.lock().take();
        });
        *slot.lock() = Some(sub);

        signal.emit(&0);
        assert_eq!(signal.listener_count(), 0);
    }
}

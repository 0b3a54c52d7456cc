use std::cell::Cell;
use std::rc::Rc;

/// Process-wide, last-value-wins signal source.
///
/// Writers call [`Signal::set`]; readers hold a [`Subscription`] and poll it
/// once per frame batch. Intermediate values between polls are dropped on
/// purpose: only the latest value matters.
///
/// Subscriptions are counted so owners can verify that every mount
/// registers and deregisters exactly once.
#[derive(Debug)]
pub struct Signal<T: Copy> {
    inner: Rc<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T: Copy> {
    name: &'static str,
    value: Cell<T>,
    version: Cell<u64>,
    subscribers: Cell<usize>,
}

impl<T: Copy> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Copy> Signal<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                name,
                value: Cell::new(initial),
                version: Cell::new(0),
                subscribers: Cell::new(0),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn set(&self, value: T) {
        self.inner.value.set(value);
        self.inner.version.set(self.inner.version.get().wrapping_add(1));
    }

    pub fn get(&self) -> T {
        self.inner.value.get()
    }

    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Registers a reader. The first poll always yields the current value.
    pub fn subscribe(&self) -> Subscription<T> {
        self.inner.subscribers.set(self.inner.subscribers.get() + 1);
        tracing::trace!(signal = self.inner.name, "subscribe");
        Subscription {
            inner: Rc::clone(&self.inner),
            seen: None,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.get()
    }
}

/// A registered reader of a [`Signal`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<T: Copy> {
    inner: Rc<Inner<T>>,
    seen: Option<u64>,
}

impl<T: Copy> Subscription<T> {
    /// Returns the latest value if it changed since the previous poll.
    pub fn poll(&mut self) -> Option<T> {
        let version = self.inner.version.get();
        if self.seen == Some(version) {
            return None;
        }
        self.seen = Some(version);
        Some(self.inner.value.get())
    }

    /// Forces the next poll to report the current value again.
    pub fn invalidate(&mut self) {
        self.seen = None;
    }

    pub fn unsubscribe(self) {}
}

impl<T: Copy> Drop for Subscription<T> {
    fn drop(&mut self) {
        let n = self.inner.subscribers.get();
        self.inner.subscribers.set(n.saturating_sub(1));
        tracing::trace!(signal = self.inner.name, "unsubscribe");
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;

    #[test]
    fn first_poll_reports_current_value() {
        let signal = Signal::new("scroll", 0.25);
        let mut sub = signal.subscribe();
        assert_eq!(sub.poll(), Some(0.25));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn last_value_wins() {
        let signal = Signal::new("scroll", 0.0);
        let mut sub = signal.subscribe();
        sub.poll();
        signal.set(1.0);
        signal.set(2.0);
        signal.set(3.0);
        assert_eq!(sub.poll(), Some(3.0));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let signal = Signal::new("pointer", (0.0, 0.0));
        let a = signal.subscribe();
        let b = signal.clone().subscribe();
        assert_eq!(signal.subscriber_count(), 2);
        drop(a);
        b.unsubscribe();
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn invalidate_replays_latest() {
        let signal = Signal::new("resize", 3u32);
        let mut sub = signal.subscribe();
        sub.poll();
        sub.invalidate();
        assert_eq!(sub.poll(), Some(3));
    }
}

//! Single-threaded event streams.
//!
//! An [`Emitter`] calls its listeners synchronously, in subscription order.
//! Listeners live as long as the [`Subscription`] returned by
//! [`Emitter::subscribe`], dropping it unsubscribes.

use smallvec::SmallVec;
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Listener<T> {
    id: usize,
    active: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct EmitterState<T> {
    next_id: usize,
    listeners: SmallVec<[Listener<T>; 4]>,
}

pub struct Emitter<T> {
    state: Rc<RefCell<EmitterState<T>>>,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(EmitterState {
                next_id: 0,
                listeners: SmallVec::new(),
            })),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, it stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push(Listener {
                id,
                active: active.clone(),
                callback: Rc::new(callback),
            });
            id
        };

        let state: Weak<RefCell<EmitterState<T>>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            active.set(false);
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }

    /// Deliver `value` to every listener.
    ///
    /// Listeners may subscribe or unsubscribe from inside the callback. A
    /// listener unsubscribed during this call is not invoked afterwards.
    pub fn emit(&self, value: &T) {
        let listeners: SmallVec<[(Rc<Cell<bool>>, Callback<T>); 4]> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|l| (l.active.clone(), l.callback.clone()))
            .collect();

        for (active, callback) in listeners {
            if active.get() {
                callback(value);
            }
        }
    }
}

impl<T> Emitter<T> {
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

/// A handle to a listener registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Unsubscribe now, same as dropping.
    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// A group of subscriptions torn down together.
///
/// After [`SubscriptionSet::dispose`] every listener of the group is gone,
/// and later pushes are dropped on the spot.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        if self.disposed {
            subscription.dispose();
            return;
        }
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Drop all subscriptions. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.subscriptions.clear();
    }
}

impl FromIterator<Subscription> for SubscriptionSet {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        Self {
            subscriptions: iter.into_iter().collect(),
            disposed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_listeners_in_order() {
        let emitter = Emitter::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let _a = emitter.subscribe({
            let log = log.clone();
            move |v| log.borrow_mut().push(("a", *v))
        });
        let _b = emitter.subscribe({
            let log = log.clone();
            move |v| log.borrow_mut().push(("b", *v))
        });

        emitter.emit(&1);
        emitter.emit(&2);

        assert_eq!(
            *log.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn test_drop_subscription_unsubscribes() {
        let emitter = Emitter::<u32>::new();
        let count = Rc::new(Cell::new(0));

        let subscription = emitter.subscribe({
            let count = count.clone();
            move |_| count.set(count.get() + 1)
        });
        emitter.emit(&0);
        assert_eq!(emitter.listener_count(), 1);

        drop(subscription);
        emitter.emit(&0);

        assert_eq!(count.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_during_emit_skips_pending_listener() {
        let emitter = Rc::new(Emitter::<u32>::new());
        let second_calls = Rc::new(Cell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = emitter.subscribe({
            let second = second.clone();
            move |_| {
                second.borrow_mut().take();
            }
        });
        *second.borrow_mut() = Some(emitter.subscribe({
            let second_calls = second_calls.clone();
            move |_| second_calls.set(second_calls.get() + 1)
        }));

        emitter.emit(&7);
        assert_eq!(second_calls.get(), 0);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_emitter() {
        let emitter = Emitter::<u32>::new();
        let subscription = emitter.subscribe(|_| {});
        drop(emitter);
        drop(subscription);
    }

    #[test]
    fn test_subscription_set_dispose() {
        let emitter = Emitter::<u32>::new();
        let count = Rc::new(Cell::new(0));
        let listener = {
            let count = count.clone();
            move |_: &u32| count.set(count.get() + 1)
        };

        let mut set: SubscriptionSet = [
            emitter.subscribe(listener.clone()),
            emitter.subscribe(listener.clone()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);

        emitter.emit(&0);
        assert_eq!(count.get(), 2);

        set.dispose();
        set.dispose();
        assert!(set.is_disposed());
        assert!(set.is_empty());

        set.push(emitter.subscribe(listener));
        emitter.emit(&0);
        assert_eq!(count.get(), 2);
        assert_eq!(emitter.listener_count(), 0);
    }
}

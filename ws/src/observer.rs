//! Change notification for store observers

use std::fmt;

use crate::item::Keyed;

/// What a mutating call did to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind<K> {
    /// Item appended
    Added(K),
    /// Add of a key that was already present; stored item kept
    Unchanged(K),
    /// Item removed
    Removed(K),
    /// Remove of a key that was not present
    Missing(K),
    /// Collection emptied
    Cleared,
    /// State replaced from the durable slot
    Reloaded,
}

impl<K> ChangeKind<K> {
    /// Check if the in-memory sequence actually changed
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ChangeKind::Unchanged(_) | ChangeKind::Missing(_))
    }
}

impl<K: fmt::Debug> fmt::Display for ChangeKind<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(k) => write!(f, "added {:?}", k),
            Self::Unchanged(k) => write!(f, "unchanged {:?}", k),
            Self::Removed(k) => write!(f, "removed {:?}", k),
            Self::Missing(k) => write!(f, "missing {:?}", k),
            Self::Cleared => write!(f, "cleared"),
            Self::Reloaded => write!(f, "reloaded"),
        }
    }
}

/// A change delivered to observers, with the items as they are after it
pub struct Change<'a, T: Keyed> {
    pub kind: ChangeKind<T::Key>,
    pub items: &'a [T],
}

impl<T: Keyed> Change<'_, T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&Change<'_, T>)>;

/// Registered observer callbacks, invoked in subscription order
pub(crate) struct Observers<T: Keyed> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: Keyed> Observers<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    pub(crate) fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<'_, T>) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    pub(crate) fn notify(&mut self, change: &Change<'_, T>) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(change);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::CollectionItem;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_subscription_order() {
        let mut observers: Observers<CollectionItem> = Observers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        observers.subscribe(move |_| log.borrow_mut().push("first"));
        let log = seen.clone();
        observers.subscribe(move |_| log.borrow_mut().push("second"));

        observers.notify(&Change {
            kind: ChangeKind::Cleared,
            items: &[],
        });

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut observers: Observers<CollectionItem> = Observers::new();
        let calls = Rc::new(RefCell::new(0));

        let counter = calls.clone();
        let id = observers.subscribe(move |_| *counter.borrow_mut() += 1);
        assert_eq!(observers.len(), 1);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));

        observers.notify(&Change {
            kind: ChangeKind::Reloaded,
            items: &[],
        });
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_change_kind_is_mutation() {
        assert!(ChangeKind::Added(1u64).is_mutation());
        assert!(ChangeKind::Removed(1u64).is_mutation());
        assert!(ChangeKind::<u64>::Cleared.is_mutation());
        assert!(!ChangeKind::Unchanged(1u64).is_mutation());
        assert!(!ChangeKind::Missing(1u64).is_mutation());
    }

    #[test]
    fn test_change_kind_display() {
        assert_eq!(ChangeKind::Added(5u64).to_string(), "added 5");
        assert_eq!(ChangeKind::<u64>::Cleared.to_string(), "cleared");
    }
}

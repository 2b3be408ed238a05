//! UI event subscriptions
//!
//! Handlers are registered on an [`EventHub`] and stay registered for as long
//! as the returned [`Subscription`] lives. Dropping the subscription is the
//! only way to deregister, so every teardown path goes through `Drop`.
//!
//! Single-threaded: hubs and subscriptions are `!Send`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Handlers<E> {
    next_id: u64,
    entries: Vec<(u64, Handler<E>)>,
}

/// Fan-out of UI events to subscribed handlers.
pub struct EventHub<E> {
    handlers: Rc<RefCell<Handlers<E>>>,
}

impl<E: 'static> EventHub<E> {
    pub fn new() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Handlers {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let mut handlers = self.handlers.borrow_mut();
        let id = handlers.next_id;
        handlers.next_id += 1;
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        handlers.entries.push((id, handler));

        let weak: Weak<RefCell<Handlers<E>>> = Rc::downgrade(&self.handlers);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(handlers) = weak.upgrade() {
                    handlers.borrow_mut().entries.retain(|(hid, _)| *hid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().entries.len()
    }

    /// Deliver `event` to every handler registered when the call starts.
    ///
    /// Handlers may subscribe or drop subscriptions while running. A handler
    /// that emits back into itself is skipped for the nested event.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self
            .handlers
            .borrow()
            .entries
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();

        for handler in snapshot {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(event),
                Err(_) => tracing::warn!("Skipping re-entrant event handler"),
            }
        }
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a handler registered. Deregisters on drop.
#[must_use = "dropping a Subscription immediately deregisters its handler"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Deregister now. Equivalent to dropping.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_drop_deregisters() {
        let hub = EventHub::<u32>::new();
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let sub = hub.subscribe(move |n| counter.set(counter.get() + n));
        hub.emit(&2);
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        hub.emit(&5);
        assert_eq!(seen.get(), 2);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = EventHub::<()>::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        sub.cancel();
    }

    #[test]
    fn test_handler_may_drop_own_subscription() {
        let hub = Rc::new(EventHub::<()>::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let slot_inner = Rc::clone(&slot);
        let calls_inner = Rc::clone(&calls);
        let sub = hub.subscribe(move |_| {
            calls_inner.set(calls_inner.get() + 1);
            slot_inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        hub.emit(&());
        hub.emit(&());
        assert_eq!(calls.get(), 1);
    }
}

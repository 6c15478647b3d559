// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradeChange {
    Created { id: i64 },
    Updated { id: i64 },
    Closed { id: i64 },
    Reopened { id: i64 },
    Deleted { id: i64 },
    Imported { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&TradeChange)>;

/// Single-threaded "trade collection changed" hub. Listeners may subscribe or
/// unsubscribe from inside a notification.
#[derive(Default)]
pub struct ChangeBus {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&TradeChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let listener: Listener = Rc::new(listener);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut ls = self.listeners.borrow_mut();
        let before = ls.len();
        ls.retain(|(sid, _)| *sid != id);
        ls.len() != before
    }

    pub fn publish(&self, change: &TradeChange) {
        tracing::debug!(?change, "trade collection changed");
        // snapshot so listeners can change the subscriber list while we dispatch
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_until_unsubscribed() {
        let bus = ChangeBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = bus.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        bus.publish(&TradeChange::Created { id: 7 });
        assert!(bus.unsubscribe(id));
        bus.publish(&TradeChange::Deleted { id: 7 });

        assert_eq!(*seen.borrow(), vec![TradeChange::Created { id: 7 }]);
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn listener_can_unsubscribe_itself_while_notified() {
        let bus = Rc::new(ChangeBus::new());
        let own_id = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));

        let (b, slot, h) = (Rc::clone(&bus), Rc::clone(&own_id), Rc::clone(&hits));
        let id = bus.subscribe(move |_| {
            h.set(h.get() + 1);
            if let Some(id) = slot.get() {
                assert!(b.unsubscribe(id));
            }
        });
        own_id.set(Some(id));

        bus.publish(&TradeChange::Updated { id: 1 });
        bus.publish(&TradeChange::Updated { id: 2 });
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn listener_added_during_publish_waits_for_next_change() {
        let bus = Rc::new(ChangeBus::new());
        let late_hits = Rc::new(Cell::new(0));

        let (b, late) = (Rc::clone(&bus), Rc::clone(&late_hits));
        bus.subscribe(move |_| {
            let l = Rc::clone(&late);
            b.subscribe(move |_| l.set(l.get() + 1));
        });

        bus.publish(&TradeChange::Created { id: 1 });
        assert_eq!(late_hits.get(), 0);
        assert_eq!(bus.subscriber_count(), 2);
        bus.publish(&TradeChange::Created { id: 2 });
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn every_subscriber_is_notified() {
        let bus = ChangeBus::new();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let h = Rc::clone(&hits);
            bus.subscribe(move |_| h.set(h.get() + 1));
        }
        bus.publish(&TradeChange::Imported { count: 2 });
        assert_eq!(hits.get(), 3);
    }
}

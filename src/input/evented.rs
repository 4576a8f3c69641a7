use crate::input::events::{Event, EventType};
use crate::prelude::HashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Event listener callback type
pub type EventCallback = Rc<dyn Fn(&Event)>;

/// Handle returned by [`Evented::on`], used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    callback: EventCallback,
    once: bool,
}

/// Listener registry shared by maps and layers.
///
/// Listeners may register or remove listeners (including themselves) while
/// an event is being fired. A listener removed mid-dispatch is not called
/// for the in-flight event.
#[derive(Default)]
pub struct Evented {
    listeners: RefCell<HashMap<EventType, Vec<Listener>>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for Evented {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts: Vec<_> = listeners
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Evented").field("listeners", &counts).finish()
    }
}

impl Evented {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, kind: EventType, callback: EventCallback, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Listener { id, callback, once });
        id
    }

    /// Register an event listener
    pub fn on<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.register(kind, Rc::new(callback), false)
    }

    /// Register a listener that is removed before its first call
    pub fn once<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.register(kind, Rc::new(callback), true)
    }

    /// Removes one listener; returns whether it was registered
    pub fn off(&self, kind: EventType, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|listener| listener.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(&kind);
        }
        removed
    }

    pub fn listens(&self, kind: EventType) -> bool {
        self.listener_count(kind) > 0
    }

    pub fn listener_count(&self, kind: EventType) -> usize {
        self.listeners
            .borrow()
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Calls every listener for `event.kind` in registration order and
    /// returns how many ran
    pub fn fire(&self, event: &Event) -> usize {
        let snapshot: Vec<(ListenerId, EventCallback)> =
            match self.listeners.borrow().get(&event.kind) {
                Some(list) => list
                    .iter()
                    .map(|listener| (listener.id, Rc::clone(&listener.callback)))
                    .collect(),
                None => return 0,
            };

        let mut called = 0;
        for (id, callback) in snapshot {
            if !self.claim(event.kind, id) {
                continue;
            }
            callback(event);
            called += 1;
        }
        called
    }

    /// Confirms `id` is still registered, dropping it first if it is a
    /// one-shot listener
    fn claim(&self, kind: EventType, id: ListenerId) -> bool {
        let once = {
            let listeners = self.listeners.borrow();
            match listeners
                .get(&kind)
                .and_then(|list| list.iter().find(|listener| listener.id == id))
            {
                Some(listener) => listener.once,
                None => return false,
            }
        };
        if once {
            self.off(kind, id);
        }
        true
    }
}

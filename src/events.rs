//! Typed publish/subscribe channels and host input events.
//!
//! Each [`Event`] carries one argument type. Handlers run synchronously, on the
//! caller's thread, in subscription order. A handler may stop propagation
//! (remaining handlers are skipped) or prevent the default action (the emitter
//! checks [`EventData::is_default_prevented`] afterwards).
//!
//! The grid delivers its notifications once it has released its own state
//! (see [`crate::grid::events`]), so grid handlers may call back into it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Key codes used by the grid and the date picker.
pub mod keys {
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const PAGE_UP: u32 = 33;
    pub const PAGE_DOWN: u32 = 34;
    pub const END: u32 = 35;
    pub const HOME: u32 = 36;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
}

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Ctrl or Cmd.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keystroke delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key_code: u32) -> Self {
        Self {
            key_code,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key_code: u32, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }
}

/// A pointer position in canvas pixels, with modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self { x, y, modifiers }
    }
}

/// Per-dispatch flags shared by every handler of one notification.
#[derive(Debug, Default)]
pub struct EventData {
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle returned by [`Event::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<A> = Rc<dyn Fn(&mut EventData, &A)>;

/// A typed event channel.
pub struct Event<A> {
    handlers: RefCell<Vec<(SubscriptionId, Handler<A>)>>,
    next_id: Cell<u64>,
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&mut EventData, &A) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false when it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }

    pub fn unsubscribe_all(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Notify with fresh event data.
    pub fn notify(&self, args: &A) -> EventData {
        let mut data = EventData::new();
        self.notify_with(args, &mut data);
        data
    }

    /// Notify, sharing `data` with the caller. Stops at the first handler that
    /// stops propagation.
    pub fn notify_with(&self, args: &A, data: &mut EventData) {
        // Snapshot so handlers may subscribe/unsubscribe while running.
        let handlers: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            if data.is_propagation_stopped() || data.is_immediate_propagation_stopped() {
                break;
            }
            handler(data, args);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_run_in_order() {
        let event: Event<u32> = Event::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            event.subscribe(move |_, n| log.borrow_mut().push(format!("{tag}{n}")));
        }
        event.notify(&7);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn test_stop_propagation_skips_rest() {
        let event: Event<()> = Event::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        event.subscribe(move |e, ()| {
            c.set(c.get() + 1);
            e.stop_immediate_propagation();
        });
        let c = Rc::clone(&calls);
        event.subscribe(move |_, ()| c.set(c.get() + 10));
        let data = event.notify(&());
        assert_eq!(calls.get(), 1);
        assert!(data.is_immediate_propagation_stopped());
    }

    #[test]
    fn test_unsubscribe() {
        let event: Event<()> = Event::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let id = event.subscribe(move |_, ()| c.set(c.get() + 1));
        event.notify(&());
        assert!(event.unsubscribe(id));
        assert!(!event.unsubscribe(id));
        event.notify(&());
        assert_eq!(calls.get(), 1);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn test_prevent_default_reported() {
        let event: Event<()> = Event::new();
        event.subscribe(|e, ()| e.prevent_default());
        assert!(event.notify(&()).is_default_prevented());
    }
}

//! Named-event subscribe/trigger registry
//!
//! Callbacks take no arguments and run synchronously, in subscription order.
//! Triggering an event nobody subscribed to is a silent no-op.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Zero-argument callback shared between the registry and in-flight triggers
pub type Callback = Rc<dyn Fn()>;

/// Kinds of events a model can emit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Attributes were merged through `set`
    Change,
    /// A save round trip completed
    Save,
    /// A fetch round trip completed
    Fetch,
    /// A fetch or save round trip failed
    Error,
    /// Any other, caller-defined event name
    Custom(String),
}

impl EventKind {
    /// Canonical event name
    pub fn name(&self) -> &str {
        match self {
            EventKind::Change => "change",
            EventKind::Save => "save",
            EventKind::Fetch => "fetch",
            EventKind::Error => "error",
            EventKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "change" => EventKind::Change,
            "save" => EventKind::Save,
            "fetch" => EventKind::Fetch,
            "error" => EventKind::Error,
            other => EventKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        EventKind::from(name.as_str())
    }
}

/// Handle returned by [`EventEmitter::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry mapping event kinds to ordered callback lists
#[derive(Default)]
pub struct EventEmitter {
    handlers: RefCell<HashMap<EventKind, Vec<(SubscriptionId, Callback)>>>,
    next_id: Cell<u64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` after any existing callbacks for `event`
    ///
    /// The same closure registered twice runs twice.
    pub fn on<F>(&self, event: impl Into<EventKind>, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        let event = event.into();
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        tracing::debug!("Subscribing {:?} to '{}'", id, event);
        self.handlers
            .borrow_mut()
            .entry(event)
            .or_default()
            .push((id, Rc::new(callback)));
        id
    }

    /// Remove a single subscription, returning whether it was registered
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        for callbacks in handlers.values_mut() {
            if let Some(pos) = callbacks.iter().position(|(sub, _)| *sub == id) {
                callbacks.remove(pos);
                tracing::debug!("Unsubscribed {:?}", id);
                return true;
            }
        }
        false
    }

    /// Invoke every callback registered for `event`
    ///
    /// The callback list is snapshotted first, so callbacks may subscribe,
    /// unsubscribe or trigger further events. Nested triggers run to
    /// completion before the remaining outer callbacks.
    pub fn trigger(&self, event: impl Into<EventKind>) {
        let event = event.into();
        let callbacks: Vec<Callback> = match self.handlers.borrow().get(&event) {
            Some(callbacks) if !callbacks.is_empty() => {
                callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect()
            }
            _ => return,
        };

        tracing::debug!("Triggering '{}' for {} callback(s)", event, callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    /// Number of callbacks currently registered for `event`
    pub fn listener_count(&self, event: impl Into<EventKind>) -> usize {
        self.handlers
            .borrow()
            .get(&event.into())
            .map_or(0, Vec::len)
    }

    /// Whether `event` was ever subscribed to, even if it has no callbacks left
    pub fn has_event(&self, event: impl Into<EventKind>) -> bool {
        self.handlers.borrow().contains_key(&event.into())
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.borrow();
        let mut map = f.debug_map();
        for (event, callbacks) in handlers.iter() {
            map.entry(&event.name(), &callbacks.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |marker: &'static str| -> Box<dyn Fn()> {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(marker))
        };
        (log, make)
    }

    #[test]
    fn test_trigger_without_subscribers_is_noop() {
        let emitter = EventEmitter::new();
        emitter.trigger("nothing-here");
        emitter.trigger(EventKind::Change);
        assert!(!emitter.has_event("nothing-here"));
        assert_eq!(emitter.listener_count(EventKind::Change), 0);
    }

    #[test]
    fn test_callbacks_run_in_subscription_order() {
        let emitter = EventEmitter::new();
        let (log, make) = recorder();
        for marker in ["first", "second", "third"] {
            let cb = make(marker);
            emitter.on("change", move || cb());
        }

        emitter.trigger("change");
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_same_callback_twice_runs_twice() {
        let emitter = EventEmitter::new();
        let count = Rc::new(Cell::new(0));
        let callback = {
            let count = Rc::clone(&count);
            move || count.set(count.get() + 1)
        };
        emitter.on(EventKind::Save, callback.clone());
        emitter.on(EventKind::Save, callback);

        emitter.trigger(EventKind::Save);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_events_are_isolated_by_name() {
        let emitter = EventEmitter::new();
        let (log, make) = recorder();
        let a = make("change");
        let b = make("save");
        emitter.on("change", move || a());
        emitter.on("save", move || b());

        emitter.trigger("save");
        assert_eq!(*log.borrow(), vec!["save"]);
    }

    #[test]
    fn test_off_removes_only_that_subscription() {
        let emitter = EventEmitter::new();
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let first = emitter.on("change", move || a());
        emitter.on("change", move || b());

        assert!(emitter.off(first));
        assert!(!emitter.off(first));
        emitter.trigger("change");
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn test_emptied_event_stays_registered() {
        let emitter = EventEmitter::new();
        let id = emitter.on("change", || {});
        emitter.off(id);

        assert!(emitter.has_event("change"));
        assert_eq!(emitter.listener_count("change"), 0);
        emitter.trigger("change");
    }

    #[test]
    fn test_subscribing_during_trigger_is_tolerated() {
        let emitter = Rc::new(EventEmitter::new());
        let late_calls = Rc::new(Cell::new(0));
        {
            let inner = Rc::clone(&emitter);
            let late_calls = Rc::clone(&late_calls);
            emitter.on("change", move || {
                let late_calls = Rc::clone(&late_calls);
                inner.on("change", move || late_calls.set(late_calls.get() + 1));
            });
        }

        emitter.trigger("change");
        assert_eq!(late_calls.get(), 0);
        assert_eq!(emitter.listener_count("change"), 2);

        emitter.trigger("change");
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_nested_trigger_runs_depth_first() {
        let emitter = Rc::new(EventEmitter::new());
        let (log, make) = recorder();
        {
            let inner = Rc::clone(&emitter);
            let outer_a = make("outer-a");
            emitter.on("outer", move || {
                outer_a();
                inner.trigger("inner");
            });
        }
        let outer_b = make("outer-b");
        emitter.on("outer", move || outer_b());
        let inner = make("inner");
        emitter.on("inner", move || inner());

        emitter.trigger("outer");
        assert_eq!(*log.borrow(), vec!["outer-a", "inner", "outer-b"]);
    }

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::from("change"), EventKind::Change);
        assert_eq!(EventKind::from("error"), EventKind::Error);
        assert_eq!(
            EventKind::from("hover"),
            EventKind::Custom("hover".to_string())
        );
        assert_eq!(EventKind::Fetch.to_string(), "fetch");
        assert_eq!(EventKind::Custom("x".into()).to_string(), "x");
    }
}

//! Views bound to a model and a render target
//!
//! A [`View`] subscribes to its model's `change` event and re-renders its
//! [`ViewTemplate`] into the target every time it fires. Rendering replaces
//! the target's content with a freshly parsed fragment whose elements have
//! the template's delegated event handlers attached.

use crate::attributes::Record;
use crate::dom::{Fragment, RenderTarget};
use crate::events::{Callback, EventKind, SubscriptionId};
use crate::model::Model;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Ordered `("<event>:<selector>", handler)` pairs
pub type EventsMap = Vec<(String, Callback)>;

/// What a concrete view supplies: its markup and its delegated handlers
pub trait ViewTemplate<T: Record> {
    /// Markup for the model's current attributes
    fn template(&self, model: &Model<T>) -> String;

    /// Handlers to attach after each render
    fn events_map(&self, _model: &Rc<Model<T>>) -> EventsMap {
        Vec::new()
    }
}

/// Split an events-map key on its first colon
///
/// `"click:.set-age"` is `("click", ".set-age")`. A key without a colon is
/// taken as an event name with an empty selector, which matches nothing.
pub fn parse_event_key(key: &str) -> (&str, &str) {
    key.split_once(':').unwrap_or((key, ""))
}

struct ViewState<R, T, C>
where
    R: RenderTarget,
    T: Record,
    C: ViewTemplate<T>,
{
    target: Rc<RefCell<R>>,
    model: Rc<Model<T>>,
    template: C,
    rendering: Cell<bool>,
    stale: Cell<bool>,
    render_count: Cell<u64>,
}

impl<R, T, C> ViewState<R, T, C>
where
    R: RenderTarget,
    T: Record,
    C: ViewTemplate<T>,
{
    fn bind_events(&self, fragment: &mut R::Fragment) {
        for (key, handler) in self.template.events_map(&self.model) {
            let (event, selector) = parse_event_key(&key);
            if selector.is_empty() {
                tracing::debug!("Events map key '{}' has no selector, skipping", key);
                continue;
            }

            let nodes = fragment.query_selector_all(selector);
            tracing::debug!("Binding '{}' to {} node(s) matching '{}'", event, nodes.len(), selector);
            for node in nodes {
                fragment.add_event_listener(node, event, Rc::clone(&handler));
            }
        }
    }

    /// Render, then render once more if the model changed mid-render
    ///
    /// A nested render request only marks the view stale. Changes made
    /// during the follow-up pass are not chased further.
    fn render(&self) {
        if self.rendering.replace(true) {
            tracing::debug!("Render requested while already rendering, deferring");
            self.stale.set(true);
            return;
        }

        self.draw();
        if self.stale.replace(false) {
            self.draw();
            if self.stale.replace(false) {
                tracing::warn!("Model kept changing while rendering, view may be stale");
            }
        }
        self.rendering.set(false);
    }

    fn draw(&self) {
        let markup = self.template.template(&self.model);
        let mut fragment = {
            let mut target = self.target.borrow_mut();
            target.clear();
            target.parse_markup(&markup)
        };
        self.bind_events(&mut fragment);
        self.target.borrow_mut().append(fragment);

        self.render_count.set(self.render_count.get() + 1);
        tracing::debug!("Rendered view (render #{})", self.render_count.get());
    }
}

/// A template bound to one model and one render target
pub struct View<R, T, C>
where
    R: RenderTarget,
    T: Record,
    C: ViewTemplate<T>,
{
    state: Rc<ViewState<R, T, C>>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl<R, T, C> View<R, T, C>
where
    R: RenderTarget + 'static,
    T: Record + 'static,
    C: ViewTemplate<T> + 'static,
{
    /// Bind `template` to `model` and `target`
    ///
    /// The view re-renders on every `change` from now on, but nothing is
    /// drawn until [`View::render`] is called.
    pub fn new(target: Rc<RefCell<R>>, model: Rc<Model<T>>, template: C) -> Self {
        let state = Rc::new(ViewState {
            target,
            model,
            template,
            rendering: Cell::new(false),
            stale: Cell::new(false),
            render_count: Cell::new(0),
        });

        let weak = Rc::downgrade(&state);
        let subscription = state.model.on(EventKind::Change, move || {
            if let Some(state) = weak.upgrade() {
                state.render();
            }
        });

        Self {
            state,
            subscription: Cell::new(Some(subscription)),
        }
    }
}

impl<R, T, C> View<R, T, C>
where
    R: RenderTarget,
    T: Record,
    C: ViewTemplate<T>,
{
    /// Replace the target's content with the current template
    ///
    /// When the template itself changes the model, the nested re-render is
    /// deferred and runs once after the current one completes.
    pub fn render(&self) {
        self.state.render();
    }

    /// Attach the template's delegated handlers to nodes in `fragment`
    pub fn bind_events(&self, fragment: &mut R::Fragment) {
        self.state.bind_events(fragment);
    }

    /// Stop re-rendering on model changes
    ///
    /// Returns `false` when the view was already detached.
    pub fn detach(&self) -> bool {
        match self.subscription.take() {
            Some(id) => self.state.model.off(id),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.get().is_some()
    }

    pub fn model(&self) -> &Rc<Model<T>> {
        &self.state.model
    }

    pub fn target(&self) -> &Rc<RefCell<R>> {
        &self.state.target
    }

    pub fn template(&self) -> &C {
        &self.state.template
    }

    /// Number of completed renders
    pub fn render_count(&self) -> u64 {
        self.state.render_count.get()
    }
}

impl<R, T, C> Drop for View<R, T, C>
where
    R: RenderTarget,
    T: Record,
    C: ViewTemplate<T>,
{
    fn drop(&mut self) {
        self.detach();
    }
}

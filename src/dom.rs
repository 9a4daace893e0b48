//! Render targets: the tree a view writes markup into
//!
//! [`RenderTarget`] and [`Fragment`] describe what a view needs from its host.
//! [`DomTarget`] is an in-memory host backed by `scraper`, able to simulate
//! user interactions through [`dispatch`].

use crate::events::Callback;
use ego_tree::NodeId;
use scraper::{Html, Selector};
use std::cell::RefCell;
use std::collections::HashMap;

/// A detached tree of parsed markup
pub trait Fragment {
    /// Handle to one node inside the fragment
    type Node;

    /// Every node matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Attach `handler` to `event` on `node`
    fn add_event_listener(&mut self, node: Self::Node, event: &str, handler: Callback);
}

/// The surface a view renders into
pub trait RenderTarget {
    type Fragment: Fragment;

    /// Remove all current content
    fn clear(&mut self);

    /// Parse `html` into a detached fragment
    fn parse_markup(&self, html: &str) -> Self::Fragment;

    /// Insert `fragment` after any existing content
    fn append(&mut self, fragment: Self::Fragment);
}

/// Parse a CSS selector; empty or invalid selectors match nothing
fn parse_selector(selector: &str) -> Option<Selector> {
    if selector.trim().is_empty() {
        return None;
    }
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

/// Parsed markup plus the listeners attached to its elements
pub struct DomFragment {
    html: Html,
    listeners: HashMap<NodeId, Vec<(String, Callback)>>,
}

impl DomFragment {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
            listeners: HashMap::new(),
        }
    }

    /// Serialized content of the fragment
    pub fn inner_html(&self) -> String {
        self.html.root_element().inner_html()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    fn handlers_for(&self, selector: &str, event: &str) -> Vec<Callback> {
        self.query_selector_all(selector)
            .into_iter()
            .filter_map(|node| self.listeners.get(&node))
            .flatten()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect()
    }

    fn text_of(&self, selector: &str) -> Vec<String> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }
}

impl Fragment for DomFragment {
    type Node = NodeId;

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.html.select(&selector).map(|el| el.id()).collect()
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, handler: Callback) {
        self.listeners
            .entry(node)
            .or_default()
            .push((event.to_string(), handler));
    }
}

/// In-memory render target holding appended fragments
#[derive(Default)]
pub struct DomTarget {
    fragments: Vec<DomFragment>,
}

impl DomTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn inner_html(&self) -> String {
        self.fragments.iter().map(DomFragment::inner_html).collect()
    }

    /// Text content of every element matching `selector`
    pub fn text_content(&self, selector: &str) -> Vec<String> {
        self.fragments
            .iter()
            .flat_map(|fragment| fragment.text_of(selector))
            .collect()
    }

    /// Handlers listening for `event` on elements matching `selector`
    pub fn listeners_for(&self, selector: &str, event: &str) -> Vec<Callback> {
        self.fragments
            .iter()
            .flat_map(|fragment| fragment.handlers_for(selector, event))
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.fragments.iter().map(DomFragment::listener_count).sum()
    }
}

impl RenderTarget for DomTarget {
    type Fragment = DomFragment;

    fn clear(&mut self) {
        self.fragments.clear();
    }

    fn parse_markup(&self, html: &str) -> DomFragment {
        DomFragment::parse(html)
    }

    fn append(&mut self, fragment: DomFragment) {
        self.fragments.push(fragment);
    }
}

/// Simulate `event` on every element matching `selector`
///
/// The target is released before handlers run, so a handler may cause the
/// target to be re-rendered. Returns the number of handlers invoked.
pub fn dispatch(target: &RefCell<DomTarget>, selector: &str, event: &str) -> usize {
    let handlers = target.borrow().listeners_for(selector, event);
    tracing::debug!("Dispatching '{}' on '{}' to {} handler(s)", event, selector, handlers.len());
    for handler in &handlers {
        handler();
    }
    handlers.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const MARKUP: &str = r#"<div><h1>Title</h1><button class="go">Go</button><button>Stop</button></div>"#;

    fn counting_handler(count: &Rc<Cell<usize>>) -> Callback {
        let count = Rc::clone(count);
        Rc::new(move || count.set(count.get() + 1))
    }

    #[test]
    fn test_query_selector_all_matches_in_document_order() {
        let fragment = DomFragment::parse(MARKUP);
        assert_eq!(fragment.query_selector_all("button").len(), 2);
        assert_eq!(fragment.query_selector_all(".go").len(), 1);
        assert!(fragment.query_selector_all(".missing").is_empty());
    }

    #[test]
    fn test_empty_and_invalid_selectors_match_nothing() {
        crate::init_test_logging();
        let fragment = DomFragment::parse(MARKUP);
        assert!(fragment.query_selector_all("").is_empty());
        assert!(fragment.query_selector_all("[[").is_empty());
    }

    #[test]
    fn test_append_and_clear() {
        let mut target = DomTarget::new();
        assert!(target.is_empty());

        let fragment = target.parse_markup("<p>one</p>");
        target.append(fragment);
        let fragment = target.parse_markup("<p>two</p>");
        target.append(fragment);
        assert_eq!(target.inner_html(), "<p>one</p><p>two</p>");
        assert_eq!(target.text_content("p"), vec!["one", "two"]);

        target.clear();
        assert!(target.is_empty());
        assert_eq!(target.inner_html(), "");
    }

    #[test]
    fn test_dispatch_invokes_matching_listeners_only() {
        crate::init_test_logging();
        let clicks = Rc::new(Cell::new(0));
        let mut fragment = DomFragment::parse(MARKUP);
        for node in fragment.query_selector_all("button") {
            fragment.add_event_listener(node, "click", counting_handler(&clicks));
        }

        let target = RefCell::new(DomTarget::new());
        target.borrow_mut().append(fragment);

        assert_eq!(dispatch(&target, ".go", "click"), 1);
        assert_eq!(dispatch(&target, "button", "click"), 2);
        assert_eq!(dispatch(&target, "button", "mouseenter"), 0);
        assert_eq!(dispatch(&target, "h1", "click"), 0);
        assert_eq!(clicks.get(), 3);
    }

    #[test]
    fn test_handler_may_replace_target_content() {
        let target = Rc::new(RefCell::new(DomTarget::new()));
        let mut fragment = DomFragment::parse(MARKUP);
        let replacer: Callback = {
            let target = Rc::clone(&target);
            Rc::new(move || {
                let mut target = target.borrow_mut();
                target.clear();
                let fresh = target.parse_markup("<p>replaced</p>");
                target.append(fresh);
            })
        };
        for node in fragment.query_selector_all(".go") {
            fragment.add_event_listener(node, "click", Rc::clone(&replacer));
        }
        target.borrow_mut().append(fragment);

        assert_eq!(dispatch(&target, ".go", "click"), 1);
        assert_eq!(target.borrow().inner_html(), "<p>replaced</p>");
    }
}

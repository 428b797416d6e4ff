//! A deterministic in-memory document for driving the engine without a browser.
//!
//! Layout is simple block stacking: every element sits below its previous sibling, its box is
//! either an explicit height, a fixed client height (scroll elements), or the sum of its
//! children's outer heights. Intersections are computed on demand with
//! [`HeadlessPlatform::take_intersections`] and fed to a [`Registry`] the way a browser would
//! call back into one.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::{
    DEFAULT_ITEM_ID_ATTRIBUTE, Dom, ElementBox, InstanceKey, IntersectionEntry,
    IntersectionObserver, Platform, Registry, ScrollAncestor, ScrollGeometry, ScrollerError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    height: Option<f64>,
    margin_top: f64,
    margin_bottom: f64,
    scroll: Option<ScrollBox>,
}

#[derive(Clone, Copy, Debug, Default)]
struct ScrollBox {
    client_height: f64,
    scroll_top: f64,
}

#[derive(Debug)]
struct ObserverSlot<I> {
    instance: I,
    root: ScrollAncestor<NodeId>,
    threshold: f64,
    // Last reported state per target; `None` until the first report.
    targets: Vec<(NodeId, Option<bool>)>,
    connected: bool,
}

#[derive(Debug)]
struct Document<I> {
    nodes: Vec<Node>,
    body: NodeId,
    selectors: HashMap<String, NodeId>,
    viewport: ScrollBox,
    // Freed when the owning observer handle drops; free entries are reused.
    observers: Vec<Option<ObserverSlot<I>>>,
    observation_supported: bool,
    observe_calls: usize,
}

impl<I> Document<I> {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.body {
                return true;
            }
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    fn content_height(&self, id: NodeId) -> f64 {
        self.node(id)
            .children
            .iter()
            .map(|&c| self.outer_height(c))
            .sum()
    }

    fn box_height(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        if let Some(scroll) = node.scroll {
            return scroll.client_height;
        }
        match node.height {
            Some(h) => h,
            None => self.content_height(id),
        }
    }

    fn outer_height(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        self.box_height(id) + node.margin_top + node.margin_bottom
    }

    fn scroll_box(&self, ancestor: &ScrollAncestor<NodeId>) -> ScrollBox {
        match ancestor {
            ScrollAncestor::Viewport => self.viewport,
            ScrollAncestor::Element(id) => self.node(*id).scroll.unwrap_or_default(),
        }
    }

    fn geometry(&self, ancestor: &ScrollAncestor<NodeId>) -> ScrollGeometry {
        let scroll = self.scroll_box(ancestor);
        let content = match ancestor {
            ScrollAncestor::Viewport => self.content_height(self.body),
            ScrollAncestor::Element(id) => self.content_height(*id),
        };
        ScrollGeometry::new(
            scroll.scroll_top,
            scroll.client_height,
            content.max(scroll.client_height),
        )
    }

    fn set_scroll_top(&mut self, ancestor: &ScrollAncestor<NodeId>, top: f64) {
        let max = self.geometry(ancestor).max_scroll_top();
        let top = top.clamp(0.0, max);
        match ancestor {
            ScrollAncestor::Viewport => self.viewport.scroll_top = top,
            ScrollAncestor::Element(id) => {
                if let Some(scroll) = self.node_mut(*id).scroll.as_mut() {
                    scroll.scroll_top = top;
                }
            }
        }
    }

    /// Offset of `id`'s border box from the start of `root`'s scroll content, or `None` when
    /// `id` is not laid out inside `root`.
    fn offset_in(&self, id: NodeId, root: &ScrollAncestor<NodeId>) -> Option<f64> {
        let node = self.node(id);
        let parent = node.parent?;
        let siblings = &self.node(parent).children;
        let mut y = node.margin_top;
        for &s in siblings.iter().take_while(|&&s| s != id) {
            y += self.outer_height(s);
        }

        match root {
            ScrollAncestor::Element(r) if *r == parent => return Some(y),
            ScrollAncestor::Viewport if parent == self.body => return Some(y),
            _ => {}
        }
        if let Some(scroll) = self.node(parent).scroll {
            y -= scroll.scroll_top;
        }
        Some(self.offset_in(parent, root)? + y)
    }

    fn is_intersecting(
        &self,
        target: NodeId,
        root: &ScrollAncestor<NodeId>,
        threshold: f64,
    ) -> bool {
        if !self.is_attached(target) {
            return false;
        }
        let Some(top) = self.offset_in(target, root) else {
            return false;
        };
        let height = self.box_height(target);
        let bottom = top + height;
        let view = self.scroll_box(root);
        let view_top = view.scroll_top;
        let view_bottom = view.scroll_top + view.client_height;

        if height <= 0.0 {
            return top >= view_top && top <= view_bottom;
        }
        let overlap = bottom.min(view_bottom) - top.max(view_top);
        if threshold <= 0.0 {
            overlap > 0.0
        } else {
            overlap / height >= threshold
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }
}

/// An in-memory [`Platform`] with one viewport and any number of scroll elements.
///
/// Clones share the same document, so a test can keep a handle while a [`Registry`] owns
/// another.
#[derive(Debug)]
pub struct HeadlessPlatform<I = u64> {
    doc: Rc<RefCell<Document<I>>>,
}

impl<I> Clone for HeadlessPlatform<I> {
    fn clone(&self) -> Self {
        Self {
            doc: Rc::clone(&self.doc),
        }
    }
}

impl<I> HeadlessPlatform<I> {
    /// Creates a document whose viewport is `viewport_height` pixels tall.
    pub fn new(viewport_height: f64) -> Self {
        let body = NodeId(0);
        let doc = Document {
            nodes: vec![Node::default()],
            body,
            selectors: HashMap::new(),
            viewport: ScrollBox {
                client_height: viewport_height,
                scroll_top: 0.0,
            },
            observers: Vec::new(),
            observation_supported: true,
            observe_calls: 0,
        };
        Self {
            doc: Rc::new(RefCell::new(doc)),
        }
    }

    pub fn body(&self) -> NodeId {
        self.doc.borrow().body
    }

    /// Creates a detached element with no height of its own.
    pub fn create_element(&self) -> NodeId {
        let mut doc = self.doc.borrow_mut();
        doc.nodes.push(Node::default());
        NodeId(doc.nodes.len() - 1)
    }

    /// Creates a detached item element carrying `id` in the default id attribute.
    pub fn create_item(&self, id: &str, height: f64) -> NodeId {
        let node = self.create_element();
        let mut doc = self.doc.borrow_mut();
        let n = doc.node_mut(node);
        n.height = Some(height);
        n.attributes
            .insert(DEFAULT_ITEM_ID_ATTRIBUTE.to_owned(), id.to_owned());
        node
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut doc = self.doc.borrow_mut();
        doc.detach(child);
        doc.node_mut(child).parent = Some(parent);
        doc.node_mut(parent).children.push(child);
    }

    /// Inserts `children` before the current first child of `parent`, keeping their order.
    pub fn prepend_children(&self, parent: NodeId, children: &[NodeId]) {
        let mut doc = self.doc.borrow_mut();
        for &child in children {
            doc.detach(child);
            doc.node_mut(child).parent = Some(parent);
        }
        let node = doc.node_mut(parent);
        let rest = std::mem::take(&mut node.children);
        node.children = children.iter().copied().chain(rest).collect();
    }

    /// Detaches `node` from its parent. It stays addressable but is no longer laid out.
    pub fn remove(&self, node: NodeId) {
        self.doc.borrow_mut().detach(node);
    }

    pub fn set_height(&self, node: NodeId, height: f64) {
        self.doc.borrow_mut().node_mut(node).height = Some(height);
    }

    pub fn set_margins(&self, node: NodeId, top: f64, bottom: f64) {
        let mut doc = self.doc.borrow_mut();
        let n = doc.node_mut(node);
        n.margin_top = top;
        n.margin_bottom = bottom;
    }

    /// Turns `node` into a scroll container with a visible height of `client_height`.
    pub fn make_scrollable(&self, node: NodeId, client_height: f64) {
        self.doc.borrow_mut().node_mut(node).scroll = Some(ScrollBox {
            client_height,
            scroll_top: 0.0,
        });
    }

    /// Makes `selector` resolve to `node` in [`Dom::query_selector`].
    pub fn register_selector(&self, selector: &str, node: NodeId) {
        self.doc
            .borrow_mut()
            .selectors
            .insert(selector.to_owned(), node);
    }

    /// Scrolls `ancestor` to `top`, clamped to its scroll range.
    pub fn scroll_to(&self, ancestor: &ScrollAncestor<NodeId>, top: f64) {
        self.doc.borrow_mut().set_scroll_top(ancestor, top);
    }

    pub fn set_observation_supported(&self, supported: bool) {
        self.doc.borrow_mut().observation_supported = supported;
    }

    /// Number of `observe` calls made on all observers.
    pub fn observe_calls(&self) -> usize {
        self.doc.borrow().observe_calls
    }

    /// Number of observers that are still connected.
    pub fn connected_observers(&self) -> usize {
        self.doc
            .borrow()
            .observers
            .iter()
            .flatten()
            .filter(|o| o.connected)
            .count()
    }

    /// Number of observer slots allocated, live or free.
    pub fn observer_slots(&self) -> usize {
        self.doc.borrow().observers.len()
    }
}

impl<I: Clone> HeadlessPlatform<I> {
    /// Computes pending intersection changes for every connected observer.
    ///
    /// Like a browser, a newly observed target is always reported once; afterwards only
    /// crossings are. Each observer with changes yields one batch tagged with its instance id.
    pub fn take_intersections(&self) -> Vec<(I, Vec<IntersectionEntry<NodeId>>)> {
        let mut doc = self.doc.borrow_mut();
        let mut states = Vec::new();
        for slot in doc.observers.iter().flatten().filter(|o| o.connected) {
            let now: Vec<bool> = slot
                .targets
                .iter()
                .map(|&(t, _)| doc.is_intersecting(t, &slot.root, slot.threshold))
                .collect();
            states.push(now);
        }

        let mut batches = Vec::new();
        let connected = doc.observers.iter_mut().flatten().filter(|o| o.connected);
        for (slot, now) in connected.zip(states) {
            let mut entries = Vec::new();
            for ((target, last), is_intersecting) in slot.targets.iter_mut().zip(now) {
                if *last != Some(is_intersecting) {
                    *last = Some(is_intersecting);
                    entries.push(IntersectionEntry::new(*target, is_intersecting));
                }
            }
            if !entries.is_empty() {
                batches.push((slot.instance.clone(), entries));
            }
        }
        batches
    }
}

impl<I: InstanceKey> HeadlessPlatform<I> {
    /// Delivers pending intersection batches to `registry`.
    ///
    /// Batches for instances the registry no longer knows are dropped. Returns the number of
    /// batches that changed a visible set.
    pub fn deliver_intersections(&self, registry: &mut Registry<Self, I>) -> usize {
        let mut changed = 0;
        for (instance, entries) in self.take_intersections() {
            match registry.handle_intersections(&instance, &entries) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(_err) => {
                    vtrace!(instance = ?instance, error = %_err, "dropping intersection batch");
                }
            }
        }
        changed
    }
}

impl<I> Dom for HeadlessPlatform<I> {
    type Element = NodeId;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.doc.borrow().selectors.get(selector).copied()
    }

    fn children(&self, container: &NodeId) -> Vec<NodeId> {
        self.doc.borrow().node(*container).children.clone()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.doc.borrow().node(*element).attributes.get(name).cloned()
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.doc
            .borrow_mut()
            .node_mut(*element)
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) {
        self.doc
            .borrow_mut()
            .node_mut(*element)
            .attributes
            .remove(name);
    }

    fn element_box(&self, element: &NodeId) -> Option<ElementBox> {
        let doc = self.doc.borrow();
        if !doc.is_attached(*element) {
            return None;
        }
        let node = doc.node(*element);
        Some(ElementBox::new(
            doc.box_height(*element),
            node.margin_top,
            node.margin_bottom,
        ))
    }

    fn scroll_geometry(&self, ancestor: &ScrollAncestor<NodeId>) -> ScrollGeometry {
        self.doc.borrow().geometry(ancestor)
    }

    fn scroll_by(&self, ancestor: &ScrollAncestor<NodeId>, delta: f64) {
        let mut doc = self.doc.borrow_mut();
        let top = doc.scroll_box(ancestor).scroll_top + delta;
        doc.set_scroll_top(ancestor, top);
    }
}

impl<I: Clone> Platform<I> for HeadlessPlatform<I> {
    type Observer = HeadlessObserver<I>;

    fn create_observer(
        &self,
        instance: &I,
        root: &ScrollAncestor<NodeId>,
        threshold: f64,
    ) -> Result<HeadlessObserver<I>, ScrollerError> {
        let mut doc = self.doc.borrow_mut();
        if !doc.observation_supported {
            return Err(ScrollerError::Observation(
                "headless document has observation disabled".to_owned(),
            ));
        }
        let slot = ObserverSlot {
            instance: instance.clone(),
            root: root.clone(),
            threshold,
            targets: Vec::new(),
            connected: true,
        };
        let index = match doc.observers.iter().position(Option::is_none) {
            Some(free) => {
                doc.observers[free] = Some(slot);
                free
            }
            None => {
                doc.observers.push(Some(slot));
                doc.observers.len() - 1
            }
        };
        Ok(HeadlessObserver {
            doc: Rc::clone(&self.doc),
            slot: index,
        })
    }
}

/// Observer handle returned by [`HeadlessPlatform`].
#[derive(Debug)]
pub struct HeadlessObserver<I> {
    doc: Rc<RefCell<Document<I>>>,
    slot: usize,
}

impl<I> IntersectionObserver for HeadlessObserver<I> {
    type Element = NodeId;

    fn observe(&mut self, target: &NodeId) {
        let mut doc = self.doc.borrow_mut();
        doc.observe_calls += 1;
        let Some(slot) = doc.observers[self.slot].as_mut() else {
            return;
        };
        if slot.connected && !slot.targets.iter().any(|&(t, _)| t == *target) {
            slot.targets.push((*target, None));
        }
    }

    fn disconnect(&mut self) {
        let mut doc = self.doc.borrow_mut();
        if let Some(slot) = doc.observers[self.slot].as_mut() {
            slot.connected = false;
            slot.targets.clear();
        }
    }
}

impl<I> Drop for HeadlessObserver<I> {
    fn drop(&mut self) {
        if let Ok(mut doc) = self.doc.try_borrow_mut() {
            doc.observers[self.slot] = None;
        }
    }
}

use crate::{Dom, IntersectionEntry, IntersectionObserver, VisibleItems};

/// Tracks which observed items currently intersect the observation root.
///
/// The tracker owns the platform observer. New items are picked up by scanning the container
/// (`observe_new_items`) rather than through an explicit add signal, so hosts can render in
/// batches and call it once per render pass.
///
/// Observed items carry the tracker's `marker` token in the watched attribute. The attribute
/// holds a space-separated token list, one token per tracker watching the item.
#[derive(Debug)]
pub struct VisibilityTracker<O> {
    observer: O,
    marker: String,
    visible: VisibleItems,
    observed: usize,
    disconnected: bool,
}

impl<O> VisibilityTracker<O> {
    pub fn new(observer: O, marker: impl Into<String>) -> Self {
        Self {
            observer,
            marker: marker.into(),
            visible: VisibleItems::new(),
            observed: 0,
            disconnected: false,
        }
    }

    pub fn visible(&self) -> &VisibleItems {
        &self.visible
    }

    /// The token this tracker writes into the watched attribute.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Total number of elements registered with the observer so far.
    pub fn observed_count(&self) -> usize {
        self.observed
    }
}

fn has_token(list: &str, token: &str) -> bool {
    list.split_ascii_whitespace().any(|t| t == token)
}

impl<O> VisibilityTracker<O> {
    /// Starts observing every child of `container` whose `watched_attribute` does not list
    /// this tracker's marker yet, and marks it.
    ///
    /// Returns the number of new registrations. Calling this again without DOM changes
    /// registers nothing.
    pub fn observe_new_items<D>(
        &mut self,
        dom: &D,
        container: &D::Element,
        watched_attribute: &str,
    ) -> usize
    where
        D: Dom,
        O: IntersectionObserver<Element = D::Element>,
    {
        if self.disconnected {
            return 0;
        }
        let mut added = 0usize;
        for child in dom.children(container) {
            let current = dom.attribute(&child, watched_attribute);
            let marked = match current.as_deref() {
                Some(list) if has_token(list, &self.marker) => continue,
                Some(list) if !list.trim().is_empty() => format!("{} {}", list.trim(), self.marker),
                _ => self.marker.clone(),
            };
            self.observer.observe(&child);
            dom.set_attribute(&child, watched_attribute, &marked);
            added += 1;
        }
        self.observed += added;
        if added > 0 {
            vtrace!(added, total = self.observed, "observe_new_items");
        }
        added
    }

    /// Applies one intersection batch in array order.
    ///
    /// Returns `true` when membership of the visible set changed.
    pub fn apply_entries<D: Dom>(
        &mut self,
        dom: &D,
        entries: &[IntersectionEntry<D::Element>],
        item_id_attribute: &str,
    ) -> bool {
        if self.disconnected {
            return false;
        }
        let mut changed = false;
        for entry in entries {
            let Some(id) = dom.attribute(&entry.target, item_id_attribute) else {
                vwarn!(
                    attribute = item_id_attribute,
                    "intersection entry target has no item id; skipped"
                );
                continue;
            };
            if entry.is_intersecting {
                changed |= self.visible.insert(&id);
            } else {
                changed |= self.visible.remove(&id);
            }
        }
        changed
    }

    /// Disconnects the observer, removes this tracker's marker from the children of
    /// `container` and forgets the visible set.
    pub fn disconnect<D>(&mut self, dom: &D, container: &D::Element, watched_attribute: &str)
    where
        D: Dom,
        O: IntersectionObserver<Element = D::Element>,
    {
        if self.disconnected {
            return;
        }
        self.observer.disconnect();
        for child in dom.children(container) {
            let Some(list) = dom.attribute(&child, watched_attribute) else {
                continue;
            };
            if !has_token(&list, &self.marker) {
                continue;
            }
            let rest: Vec<&str> = list
                .split_ascii_whitespace()
                .filter(|&t| t != self.marker)
                .collect();
            if rest.is_empty() {
                dom.remove_attribute(&child, watched_attribute);
            } else {
                dom.set_attribute(&child, watched_attribute, &rest.join(" "));
            }
        }
        self.visible.clear();
        self.disconnected = true;
    }
}

use crate::{
    Dom, IntersectionEntry, IntersectionObserver, ScrollAncestor, ScrollerOptions,
    VisibilityTracker, VisibleItems, anchor, guard,
};

/// Per-instance state: what scrolls, what holds the items, and the visibility tracker.
pub struct Scroller<E, O, I> {
    ancestor: ScrollAncestor<E>,
    container: E,
    tracker: VisibilityTracker<O>,
    options: ScrollerOptions<I>,
}

impl<E, O, I> Scroller<E, O, I> {
    pub(crate) fn new(
        ancestor: ScrollAncestor<E>,
        container: E,
        observer: O,
        marker: String,
        options: ScrollerOptions<I>,
    ) -> Self {
        Self {
            ancestor,
            container,
            tracker: VisibilityTracker::new(observer, marker),
            options,
        }
    }

    pub fn scroll_ancestor(&self) -> &ScrollAncestor<E> {
        &self.ancestor
    }

    pub fn items_container(&self) -> &E {
        &self.container
    }

    pub fn options(&self) -> &ScrollerOptions<I> {
        &self.options
    }

    pub fn tracker(&self) -> &VisibilityTracker<O> {
        &self.tracker
    }

    pub fn visible_items(&self) -> &VisibleItems {
        self.tracker.visible()
    }
}

impl<E, O, I> Scroller<E, O, I>
where
    E: Clone,
    O: IntersectionObserver<Element = E>,
{
    pub(crate) fn observe_new_items<D: Dom<Element = E>>(&mut self, dom: &D) -> usize {
        self.tracker
            .observe_new_items(dom, &self.container, &self.options.watched_attribute)
    }

    /// Applies a batch and notifies the host once if membership changed.
    pub(crate) fn handle_intersections<D: Dom<Element = E>>(
        &mut self,
        dom: &D,
        instance: &I,
        entries: &[IntersectionEntry<E>],
    ) -> bool
    where
        I: core::fmt::Debug,
    {
        let changed =
            self.tracker
                .apply_entries(dom, entries, &self.options.item_id_attribute);
        if !changed {
            return false;
        }
        if let Some(cb) = &self.options.on_viewport_changed {
            let visible = self.tracker.visible().as_slice();
            if let Err(_err) = cb(instance, visible) {
                vwarn!(instance = ?instance, error = %_err, "viewport notification failed");
            }
        }
        true
    }

    pub(crate) fn compensate_for_prepended_items<D: Dom<Element = E>>(
        &self,
        dom: &D,
        count: usize,
    ) -> bool {
        anchor::compensate_for_prepended_items(
            dom,
            &self.ancestor,
            &self.container,
            count,
            self.options.near_top_threshold,
        )
    }

    pub(crate) fn ensure_not_at_bottom<D: Dom<Element = E>>(&self, dom: &D) -> bool {
        guard::ensure_not_at_bottom(
            dom,
            &self.ancestor,
            self.options.bottom_epsilon,
            self.options.bottom_nudge,
        )
    }

    pub(crate) fn disconnect<D: Dom<Element = E>>(&mut self, dom: &D) {
        self.tracker
            .disconnect(dom, &self.container, &self.options.watched_attribute);
    }
}

impl<E: core::fmt::Debug, O, I> core::fmt::Debug for Scroller<E, O, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scroller")
            .field("ancestor", &self.ancestor)
            .field("container", &self.container)
            .field("visible", self.tracker.visible())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

use std::rc::Rc;

use crate::{DeliveryError, ItemId};

/// A callback fired with the full visible-id sequence whenever its membership changes.
///
/// Delivery is fire-and-forget: return `Err` to report a failed hand-off, which is logged and
/// otherwise ignored. Implementations that talk to an asynchronous host should start the call and
/// return without waiting for it.
pub type OnViewportChanged<I> = Rc<dyn Fn(&I, &[ItemId]) -> Result<(), DeliveryError>>;

pub const DEFAULT_ITEM_ID_ATTRIBUTE: &str = "data-item-id";
pub const DEFAULT_WATCHED_ATTRIBUTE: &str = "data-viewport-observed";
pub const DEFAULT_NEAR_TOP_THRESHOLD: f64 = 25.0;
pub const DEFAULT_BOTTOM_EPSILON: f64 = 1.0;
pub const DEFAULT_BOTTOM_NUDGE: f64 = 1.0;

/// Configuration for one scroller instance.
///
/// Cheap to clone: the callback is stored in an `Rc`.
pub struct ScrollerOptions<I> {
    /// Selector of a scrollable ancestor. `None` (or an empty string) scrolls the viewport.
    pub scroll_ancestor: Option<String>,

    /// Attribute holding each item's id.
    pub item_id_attribute: String,

    /// Attribute set on items once they are observed.
    pub watched_attribute: String,

    /// Intersection threshold. `0.0` reports any crossing of the root's edge.
    pub threshold: f64,

    /// Prepend compensation only runs while the scroll offset is below this value.
    pub near_top_threshold: f64,

    /// Rounding slack when deciding whether the scroll position sits at the bottom.
    pub bottom_epsilon: f64,

    /// How far [`crate::Registry::ensure_not_at_bottom`] scrolls back.
    pub bottom_nudge: f64,

    pub on_viewport_changed: Option<OnViewportChanged<I>>,
}

impl<I> Clone for ScrollerOptions<I> {
    fn clone(&self) -> Self {
        Self {
            scroll_ancestor: self.scroll_ancestor.clone(),
            item_id_attribute: self.item_id_attribute.clone(),
            watched_attribute: self.watched_attribute.clone(),
            threshold: self.threshold,
            near_top_threshold: self.near_top_threshold,
            bottom_epsilon: self.bottom_epsilon,
            bottom_nudge: self.bottom_nudge,
            on_viewport_changed: self.on_viewport_changed.clone(),
        }
    }
}

impl<I> Default for ScrollerOptions<I> {
    fn default() -> Self {
        Self {
            scroll_ancestor: None,
            item_id_attribute: DEFAULT_ITEM_ID_ATTRIBUTE.to_owned(),
            watched_attribute: DEFAULT_WATCHED_ATTRIBUTE.to_owned(),
            threshold: 0.0,
            near_top_threshold: DEFAULT_NEAR_TOP_THRESHOLD,
            bottom_epsilon: DEFAULT_BOTTOM_EPSILON,
            bottom_nudge: DEFAULT_BOTTOM_NUDGE,
            on_viewport_changed: None,
        }
    }
}

impl<I> ScrollerOptions<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scrolls the element matching `selector` instead of the viewport.
    pub fn with_scroll_ancestor(mut self, selector: impl Into<String>) -> Self {
        self.scroll_ancestor = Some(selector.into());
        self
    }

    pub fn with_item_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.item_id_attribute = name.into();
        self
    }

    pub fn with_watched_attribute(mut self, name: impl Into<String>) -> Self {
        self.watched_attribute = name.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_near_top_threshold(mut self, threshold: f64) -> Self {
        self.near_top_threshold = threshold;
        self
    }

    pub fn with_bottom_guard(mut self, epsilon: f64, nudge: f64) -> Self {
        self.bottom_epsilon = epsilon;
        self.bottom_nudge = nudge;
        self
    }

    pub fn with_on_viewport_changed(
        mut self,
        f: impl Fn(&I, &[ItemId]) -> Result<(), DeliveryError> + 'static,
    ) -> Self {
        self.on_viewport_changed = Some(Rc::new(f));
        self
    }

    /// The configured scroll-ancestor selector, with empty strings treated as absent.
    pub fn scroll_ancestor_selector(&self) -> Option<&str> {
        self.scroll_ancestor
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl<I> core::fmt::Debug for ScrollerOptions<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollerOptions")
            .field("scroll_ancestor", &self.scroll_ancestor)
            .field("item_id_attribute", &self.item_id_attribute)
            .field("watched_attribute", &self.watched_attribute)
            .field("threshold", &self.threshold)
            .field("near_top_threshold", &self.near_top_threshold)
            .field("bottom_epsilon", &self.bottom_epsilon)
            .field("bottom_nudge", &self.bottom_nudge)
            .finish_non_exhaustive()
    }
}

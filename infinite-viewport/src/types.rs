use std::fmt;

/// The identifier a rendered item carries in its id attribute.
pub type ItemId = String;

/// Which element's scroll offset is measured and adjusted.
#[derive(Clone, PartialEq, Eq)]
pub enum ScrollAncestor<E> {
    /// The top-level viewport (window scrolling).
    Viewport,
    /// A scrollable element.
    Element(E),
}

impl<E> ScrollAncestor<E> {
    pub fn is_viewport(&self) -> bool {
        matches!(self, Self::Viewport)
    }

    pub fn element(&self) -> Option<&E> {
        match self {
            Self::Viewport => None,
            Self::Element(e) => Some(e),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ScrollAncestor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewport => f.write_str("Viewport"),
            Self::Element(e) => f.debug_tuple("Element").field(e).finish(),
        }
    }
}

/// Scroll geometry of a scroll ancestor, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollGeometry {
    /// Current scroll offset from the top of the content.
    pub scroll_top: f64,
    /// Height of the visible area.
    pub client_height: f64,
    /// Total content height.
    pub scroll_height: f64,
}

impl ScrollGeometry {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// The content offset of the bottom edge of the visible area.
    pub fn scroll_bottom(&self) -> f64 {
        self.scroll_top + self.client_height
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Whether the visible area touches the end of the content, allowing `epsilon` pixels of
    /// rounding slack.
    pub fn is_at_bottom(&self, epsilon: f64) -> bool {
        self.scroll_bottom() >= self.scroll_height - epsilon
    }
}

/// The vertical box of a laid-out element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementBox {
    /// Border-box height (`offsetHeight` in the DOM).
    pub offset_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl ElementBox {
    pub fn new(offset_height: f64, margin_top: f64, margin_bottom: f64) -> Self {
        Self {
            offset_height,
            margin_top,
            margin_bottom,
        }
    }

    /// Height including vertical margins, rounded up to a whole pixel.
    pub fn outer_height(&self) -> u32 {
        let h = (self.offset_height + self.margin_top + self.margin_bottom).ceil();
        if h.is_finite() && h > 0.0 {
            h as u32
        } else {
            0
        }
    }
}

/// One record of an intersection batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntersectionEntry<E> {
    pub target: E,
    pub is_intersecting: bool,
}

impl<E> IntersectionEntry<E> {
    pub fn new(target: E, is_intersecting: bool) -> Self {
        Self {
            target,
            is_intersecting,
        }
    }

    pub fn entered(target: E) -> Self {
        Self::new(target, true)
    }

    pub fn left(target: E) -> Self {
        Self::new(target, false)
    }
}

/// Ordered set of the item ids currently intersecting the observation root.
///
/// Order is first-enter order; an id appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VisibleItems {
    ids: Vec<ItemId>,
}

impl VisibleItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` unless it is already present. Returns whether the set changed.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_owned());
        true
    }

    /// Removes `id`, keeping the order of the rest. Returns whether the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|v| v == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|v| v == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn to_vec(&self) -> Vec<ItemId> {
        self.ids.clone()
    }
}

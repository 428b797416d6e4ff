use crate::{ElementBox, ScrollAncestor, ScrollGeometry, ScrollerError};

/// Read access to the rendered document, plus the few writes the engine needs.
///
/// The engine never changes item content. It writes the watched marker attribute and scroll
/// offsets, and reads everything else.
///
/// Each scroller owns one whitespace-free token in the watched attribute, so several scrollers
/// can watch the same items and a disposed scroller leaves nothing behind.
pub trait Dom {
    type Element: Clone;

    /// Resolves a selector against the document.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Direct children of `container`, in document order.
    fn children(&self, container: &Self::Element) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn remove_attribute(&self, element: &Self::Element, name: &str);

    /// The element's vertical box, or `None` when it is no longer laid out (e.g. detached).
    fn element_box(&self, element: &Self::Element) -> Option<ElementBox>;

    /// Viewport geometry for [`ScrollAncestor::Viewport`], the element's own scroll metrics
    /// otherwise.
    fn scroll_geometry(&self, ancestor: &ScrollAncestor<Self::Element>) -> ScrollGeometry;

    /// Scrolls `ancestor` by `delta` pixels (positive is towards the end of the content).
    fn scroll_by(&self, ancestor: &ScrollAncestor<Self::Element>, delta: f64);
}

/// A registration handle for intersection observation.
///
/// Observers deliver their batches out of band, through
/// [`crate::Registry::handle_intersections`] with the instance id they were created for.
pub trait IntersectionObserver {
    type Element;

    fn observe(&mut self, target: &Self::Element);

    /// Stops all observation. No batch is delivered for this observer afterwards.
    fn disconnect(&mut self);
}

/// A [`Dom`] that can also create intersection observers tagged with an instance id `I`.
pub trait Platform<I>: Dom {
    type Observer: IntersectionObserver<Element = Self::Element>;

    /// Creates an observer rooted at `root` that reports boundary crossings at `threshold`.
    ///
    /// Fails with [`ScrollerError::Observation`] when the environment has no usable
    /// intersection API.
    fn create_observer(
        &self,
        instance: &I,
        root: &ScrollAncestor<Self::Element>,
        threshold: f64,
    ) -> Result<Self::Observer, ScrollerError>;
}

use crate::key::InstanceMap;
use crate::{
    Dom, InstanceKey, IntersectionEntry, Platform, ScrollAncestor, Scroller, ScrollerError,
    ScrollerOptions, VisibleItems,
};

/// The scroller type a registry over platform `P` stores.
pub type ScrollerFor<P, I> = Scroller<<P as Dom>::Element, <P as Platform<I>>::Observer, I>;

/// Owns every scroller instance on a page and the platform they run on.
///
/// All operations are addressed by instance id. Platform observers deliver their batches through
/// [`Registry::handle_intersections`], so a batch that arrives after its instance was disposed
/// fails the lookup and never reaches the host.
pub struct Registry<P: Platform<I>, I: InstanceKey = u64> {
    platform: P,
    scrollers: InstanceMap<I, ScrollerFor<P, I>>,
    created: u64,
}

impl<P: Platform<I>, I: InstanceKey> Registry<P, I> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            scrollers: InstanceMap::new(),
            created: 0,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn len(&self) -> usize {
        self.scrollers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scrollers.is_empty()
    }

    pub fn contains(&self, id: &I) -> bool {
        self.scrollers.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.scrollers.keys()
    }

    /// Registers a scroller for `items_container` under `id`.
    ///
    /// The scroll ancestor comes from `options.scroll_ancestor`; without one the viewport
    /// scrolls. Call [`Registry::observe_new_items`] after rendering to start tracking.
    pub fn create(
        &mut self,
        id: I,
        items_container: P::Element,
        options: ScrollerOptions<I>,
    ) -> Result<&ScrollerFor<P, I>, ScrollerError> {
        if self.scrollers.contains_key(&id) {
            return Err(ScrollerError::duplicate(&id));
        }

        let ancestor = match options.scroll_ancestor_selector() {
            None => ScrollAncestor::Viewport,
            Some(selector) => match self.platform.query_selector(selector) {
                Some(element) => ScrollAncestor::Element(element),
                None => {
                    return Err(ScrollerError::Configuration {
                        selector: selector.to_owned(),
                    });
                }
            },
        };

        let observer = self
            .platform
            .create_observer(&id, &ancestor, options.threshold)?;
        vdebug!(
            instance = ?id,
            viewport = ancestor.is_viewport(),
            "scroller created"
        );

        self.created += 1;
        let marker = format!("s{}", self.created);
        let scroller = Scroller::new(ancestor, items_container, observer, marker, options);
        Ok(self.scrollers.entry(id).or_insert(scroller))
    }

    pub fn get(&self, id: &I) -> Result<&ScrollerFor<P, I>, ScrollerError> {
        self.scrollers
            .get(id)
            .ok_or_else(|| ScrollerError::unknown(id))
    }

    /// Starts observing items rendered since the last call. Returns the number of new
    /// registrations.
    pub fn observe_new_items(&mut self, id: &I) -> Result<usize, ScrollerError> {
        let scroller = self
            .scrollers
            .get_mut(id)
            .ok_or_else(|| ScrollerError::unknown(id))?;
        Ok(scroller.observe_new_items(&self.platform))
    }

    /// Applies an intersection batch delivered for `id`.
    ///
    /// When membership changed, the instance's `on_viewport_changed` callback is invoked once
    /// with the full visible sequence. Returns whether membership changed.
    pub fn handle_intersections(
        &mut self,
        id: &I,
        entries: &[IntersectionEntry<P::Element>],
    ) -> Result<bool, ScrollerError> {
        let scroller = self
            .scrollers
            .get_mut(id)
            .ok_or_else(|| ScrollerError::unknown(id))?;
        Ok(scroller.handle_intersections(&self.platform, id, entries))
    }

    /// Adjusts the scroll offset after `count` items were prepended. See
    /// [`crate::compensate_for_prepended_items`].
    pub fn compensate_for_prepended_items(
        &self,
        id: &I,
        count: usize,
    ) -> Result<bool, ScrollerError> {
        let scroller = self.get(id)?;
        Ok(scroller.compensate_for_prepended_items(&self.platform, count))
    }

    /// See [`crate::ensure_not_at_bottom`].
    ///
    /// Returns `false` without scrolling when the scroll offset is zero, including content
    /// that fits entirely and therefore sits at its bottom edge. Only a list that has been
    /// scrolled to its end is nudged back.
    pub fn ensure_not_at_bottom(&self, id: &I) -> Result<bool, ScrollerError> {
        let scroller = self.get(id)?;
        Ok(scroller.ensure_not_at_bottom(&self.platform))
    }

    pub fn visible_items(&self, id: &I) -> Result<&VisibleItems, ScrollerError> {
        Ok(self.get(id)?.visible_items())
    }

    /// Disconnects the instance's observer, removes its marker from the items and drops its
    /// state. A new scroller created under the same id starts from scratch.
    pub fn dispose(&mut self, id: &I) -> Result<(), ScrollerError> {
        let mut scroller = self
            .scrollers
            .remove(id)
            .ok_or_else(|| ScrollerError::unknown(id))?;
        scroller.disconnect(&self.platform);
        vdebug!(instance = ?id, "scroller disposed");
        Ok(())
    }

    /// Alias of [`Registry::dispose`].
    pub fn destroy(&mut self, id: &I) -> Result<(), ScrollerError> {
        self.dispose(id)
    }

    /// Disposes every instance.
    pub fn clear(&mut self) {
        for (_, mut scroller) in self.scrollers.drain() {
            scroller.disconnect(&self.platform);
        }
    }
}

impl<P: Platform<I>, I: InstanceKey> Drop for Registry<P, I> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<P: Platform<I>, I: InstanceKey> core::fmt::Debug for Registry<P, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("instances", &self.scrollers.len())
            .finish_non_exhaustive()
    }
}

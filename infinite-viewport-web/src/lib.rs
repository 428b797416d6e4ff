//! Browser bindings for the `infinite-viewport` crate.
//!
//! [`WebPlatform`] implements the engine's platform seam on top of `web-sys`
//! (`IntersectionObserver`, element geometry, window scrolling). [`VirtualScroller`] exposes a
//! registry of scrollers to JavaScript:
//!
//! ```js
//! const scroller = new VirtualScroller();
//! scroller.init(null, list, "feed", (id, visible) => host.updateViewport(visible));
//! // after every render pass
//! scroller.observeNewItems("feed");
//! // after prepending 20 items
//! scroller.compensateForPrependedItems("feed", 20);
//! ```
//!
//! Logging goes through `tracing`; install a subscriber (e.g. `tracing-wasm`) to see it in the
//! browser console.
#![forbid(unsafe_code)]

mod notify;
mod options;
mod platform;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use infinite_viewport::{Registry, ScrollerError};
use js_sys::Function;
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub use options::WebScrollerOptions;
pub use platform::{WebObserver, WebPlatform};

use platform::SharedRegistry;

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// A set of independent infinite-list scrollers on one page, addressed by string ids.
#[wasm_bindgen]
pub struct VirtualScroller {
    registry: Rc<SharedRegistry>,
}

impl VirtualScroller {
    fn with_registry<T>(
        &self,
        f: impl FnOnce(&mut Registry<WebPlatform, String>) -> Result<T, ScrollerError>,
    ) -> Result<T, JsValue> {
        let mut registry = self
            .registry
            .try_borrow_mut()
            .map_err(|_| js_error("scroller registry is busy"))?;
        f(&mut registry).map_err(js_error)
    }
}

#[wasm_bindgen]
impl VirtualScroller {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<VirtualScroller, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("window has no document"))?;
        let registry = Rc::new_cyclic(|weak| {
            RefCell::new(Registry::new(WebPlatform::new(
                window,
                document,
                weak.clone(),
            )))
        });
        Ok(Self { registry })
    }

    /// Registers a scroller for `items_container`.
    ///
    /// `scroll_ancestor_selector` names the scrolling element; `null` or `""` scrolls the
    /// window. `on_viewport_changed(instanceId, visibleItemIds)` is called whenever the set of
    /// visible items changes. `options` is an optional [`WebScrollerOptions`] object.
    pub fn init(
        &self,
        scroll_ancestor_selector: Option<String>,
        items_container: Element,
        instance_id: String,
        on_viewport_changed: Function,
        options: JsValue,
    ) -> Result<(), JsValue> {
        let extra: WebScrollerOptions = if options.is_undefined() || options.is_null() {
            WebScrollerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let options = extra
            .into_options(scroll_ancestor_selector)
            .with_on_viewport_changed(notify::js_viewport_sink(on_viewport_changed));

        debug!(instance = %instance_id, "init");
        self.with_registry(|r| r.create(instance_id, items_container, options).map(|_| ()))
    }

    /// Starts observing items rendered since the last call. Returns how many were added.
    #[wasm_bindgen(js_name = observeNewItems)]
    pub fn observe_new_items(&self, instance_id: String) -> Result<u32, JsValue> {
        self.with_registry(|r| r.observe_new_items(&instance_id))
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
    }

    /// Keeps the view in place after `count` items were inserted at the top of the list.
    #[wasm_bindgen(js_name = compensateForPrependedItems)]
    pub fn compensate_for_prepended_items(
        &self,
        instance_id: String,
        count: u32,
    ) -> Result<bool, JsValue> {
        self.with_registry(|r| r.compensate_for_prepended_items(&instance_id, count as usize))
    }

    /// Steps one pixel off the bottom so appended items do not drag the view along.
    #[wasm_bindgen(js_name = ensureNotAtBottom)]
    pub fn ensure_not_at_bottom(&self, instance_id: String) -> Result<bool, JsValue> {
        self.with_registry(|r| r.ensure_not_at_bottom(&instance_id))
    }

    #[wasm_bindgen(js_name = visibleItemIds)]
    pub fn visible_item_ids(&self, instance_id: String) -> Result<Vec<String>, JsValue> {
        self.with_registry(|r| Ok(r.visible_items(&instance_id)?.to_vec()))
    }

    pub fn dispose(&self, instance_id: String) -> Result<(), JsValue> {
        self.with_registry(|r| r.dispose(&instance_id))
    }
}

use std::cell::RefCell;
use std::rc::Weak;

use infinite_viewport::{
    Dom, ElementBox, IntersectionEntry, Platform, Registry, ScrollAncestor, ScrollGeometry,
    ScrollerError,
};
use js_sys::Array;
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

pub(crate) type SharedRegistry = RefCell<Registry<WebPlatform, String>>;

type ObserverCallback = Closure<dyn FnMut(Array, web_sys::IntersectionObserver)>;

/// The browser document as an engine [`Platform`].
///
/// Observers hold a weak reference back to the registry that owns this platform and deliver
/// their batches into it, tagged with the instance id they were created for.
pub struct WebPlatform {
    window: Window,
    document: Document,
    registry: Weak<SharedRegistry>,
}

impl WebPlatform {
    pub(crate) fn new(window: Window, document: Document, registry: Weak<SharedRegistry>) -> Self {
        Self {
            window,
            document,
            registry,
        }
    }

    fn margins(&self, element: &Element) -> (f64, f64) {
        let Some(style) = self.window.get_computed_style(element).ok().flatten() else {
            return (0.0, 0.0);
        };
        let read = |name: &str| {
            style
                .get_property_value(name)
                .map(|v| parse_px(&v))
                .unwrap_or(0.0)
        };
        (read("margin-top"), read("margin-bottom"))
    }
}

impl Dom for WebPlatform {
    type Element = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                warn!(selector, error = ?err, "invalid scroll ancestor selector");
                None
            }
        }
    }

    fn children(&self, container: &Element) -> Vec<Element> {
        let children = container.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        if let Err(err) = element.set_attribute(name, value) {
            warn!(name, error = ?err, "failed to set attribute");
        }
    }

    fn remove_attribute(&self, element: &Element, name: &str) {
        if let Err(err) = element.remove_attribute(name) {
            warn!(name, error = ?err, "failed to remove attribute");
        }
    }

    fn element_box(&self, element: &Element) -> Option<ElementBox> {
        if !element.is_connected() {
            return None;
        }
        let offset_height = match element.dyn_ref::<HtmlElement>() {
            Some(html) => f64::from(html.offset_height()),
            None => element.get_bounding_client_rect().height(),
        };
        let (margin_top, margin_bottom) = self.margins(element);
        Some(ElementBox::new(offset_height, margin_top, margin_bottom))
    }

    fn scroll_geometry(&self, ancestor: &ScrollAncestor<Element>) -> ScrollGeometry {
        match ancestor {
            ScrollAncestor::Viewport => {
                let scroll_top = self.window.scroll_y().unwrap_or(0.0);
                let client_height = self
                    .window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                let scroll_height = self
                    .document
                    .scrolling_element()
                    .or_else(|| self.document.document_element())
                    .map(|root| f64::from(root.scroll_height()))
                    .unwrap_or(client_height);
                ScrollGeometry::new(scroll_top, client_height, scroll_height)
            }
            ScrollAncestor::Element(element) => ScrollGeometry::new(
                f64::from(element.scroll_top()),
                f64::from(element.client_height()),
                f64::from(element.scroll_height()),
            ),
        }
    }

    fn scroll_by(&self, ancestor: &ScrollAncestor<Element>, delta: f64) {
        match ancestor {
            ScrollAncestor::Viewport => self.window.scroll_by_with_x_and_y(0.0, delta),
            ScrollAncestor::Element(element) => element.scroll_by_with_x_and_y(0.0, delta),
        }
    }
}

impl Platform<String> for WebPlatform {
    type Observer = WebObserver;

    fn create_observer(
        &self,
        instance: &String,
        root: &ScrollAncestor<Element>,
        threshold: f64,
    ) -> Result<WebObserver, ScrollerError> {
        let registry = Weak::clone(&self.registry);
        let instance = instance.clone();
        let callback: ObserverCallback = Closure::new(
            move |records: Array, _observer: web_sys::IntersectionObserver| {
                deliver(&registry, &instance, &records);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root(root.element());
        init.set_threshold(&JsValue::from_f64(threshold));

        let observer = web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        )
        .map_err(|err| ScrollerError::Observation(format!("{err:?}")))?;

        Ok(WebObserver {
            observer,
            _callback: callback,
        })
    }
}

fn deliver(registry: &Weak<SharedRegistry>, instance: &String, records: &Array) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    let entries: Vec<IntersectionEntry<Element>> = records
        .iter()
        .filter_map(|record| record.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|record| IntersectionEntry::new(record.target(), record.is_intersecting()))
        .collect();

    let Ok(mut registry) = registry.try_borrow_mut() else {
        warn!(instance = %instance, "registry busy; intersection batch dropped");
        return;
    };
    match registry.handle_intersections(instance, &entries) {
        Ok(changed) => trace!(
            instance = %instance,
            changed,
            entries = entries.len(),
            "intersection batch"
        ),
        Err(err) => debug!(
            instance = %instance,
            error = %err,
            "intersection batch for disposed scroller"
        ),
    }
}

/// A browser `IntersectionObserver` plus the closure it calls.
pub struct WebObserver {
    observer: web_sys::IntersectionObserver,
    _callback: ObserverCallback,
}

impl infinite_viewport::IntersectionObserver for WebObserver {
    type Element = Element;

    fn observe(&mut self, target: &Element) {
        self.observer.observe(target);
    }

    fn disconnect(&mut self) {
        self.stop();
    }
}

impl WebObserver {
    // `disconnect` only clears the observation targets. Entries already queued for the next
    // notification are still delivered unless they are taken here first.
    fn stop(&self) {
        let _pending = self.observer.take_records();
        self.observer.disconnect();
    }
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Parses a computed CSS length such as `"12.5px"`. Anything unparsable counts as zero.
pub(crate) fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

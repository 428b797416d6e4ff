use infinite_viewport::{DeliveryError, ItemId};
use js_sys::{Array, Function, Promise};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};

/// Wraps a JS `(instanceId, visibleItemIds) => any` handler as a viewport sink.
///
/// The handler runs on the next microtask, never inside the intersection callback, and a
/// returned promise is awaited off the tracking path. Failures are logged only: the scroller
/// may already be disposed when they surface.
pub(crate) fn js_viewport_sink(
    handler: Function,
) -> impl Fn(&String, &[ItemId]) -> Result<(), DeliveryError> + 'static {
    move |instance: &String, visible: &[ItemId]| {
        let handler = handler.clone();
        let instance = instance.clone();
        let ids: Array = visible.iter().map(|id| JsValue::from_str(id)).collect();
        spawn_local(async move {
            let ret = match handler.call2(&JsValue::NULL, &JsValue::from_str(&instance), &ids) {
                Ok(ret) => ret,
                Err(err) => {
                    warn!(instance = %instance, error = ?err, "viewport handler threw");
                    return;
                }
            };
            if let Ok(promise) = ret.dyn_into::<Promise>() {
                if let Err(err) = JsFuture::from(promise).await {
                    debug!(instance = %instance, error = ?err, "viewport handler rejected");
                }
            }
        });
        Ok(())
    }
}

use infinite_viewport::ScrollerOptions;
use serde::Deserialize;

/// Options accepted from JavaScript as a plain object. Every field is optional.
///
/// ```js
/// scroller.init("#feed", container, "feed-1", onChanged, { nearTopThreshold: 40 });
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WebScrollerOptions {
    pub item_id_attribute: Option<String>,
    pub watched_attribute: Option<String>,
    pub threshold: Option<f64>,
    pub near_top_threshold: Option<f64>,
    pub bottom_epsilon: Option<f64>,
    pub bottom_nudge: Option<f64>,
}

impl WebScrollerOptions {
    /// Applies the set fields on top of the engine defaults.
    pub fn into_options(self, scroll_ancestor: Option<String>) -> ScrollerOptions<String> {
        let mut options = ScrollerOptions::new();
        options.scroll_ancestor = scroll_ancestor;
        if let Some(name) = self.item_id_attribute {
            options.item_id_attribute = name;
        }
        if let Some(name) = self.watched_attribute {
            options.watched_attribute = name;
        }
        if let Some(v) = self.threshold {
            options.threshold = v;
        }
        if let Some(v) = self.near_top_threshold {
            options.near_top_threshold = v;
        }
        if let Some(v) = self.bottom_epsilon {
            options.bottom_epsilon = v;
        }
        if let Some(v) = self.bottom_nudge {
            options.bottom_nudge = v;
        }
        options
    }
}

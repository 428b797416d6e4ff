use crate::options::WebScrollerOptions;
use crate::platform::parse_px;

use infinite_viewport::{DEFAULT_ITEM_ID_ATTRIBUTE, DEFAULT_NEAR_TOP_THRESHOLD};

#[test]
fn parse_px_reads_computed_lengths() {
    assert_eq!(parse_px("12px"), 12.0);
    assert_eq!(parse_px(" 0.5px "), 0.5);
    assert_eq!(parse_px("-4px"), -4.0);
    assert_eq!(parse_px("0"), 0.0);
}

#[test]
fn parse_px_treats_keywords_as_zero() {
    assert_eq!(parse_px(""), 0.0);
    assert_eq!(parse_px("auto"), 0.0);
    assert_eq!(parse_px("NaNpx"), 0.0);
}

#[test]
fn js_options_use_camel_case_and_keep_defaults() {
    let extra: WebScrollerOptions = serde_json::from_str(
        r#"{ "nearTopThreshold": 40, "itemIdAttribute": "data-bzr-id" }"#,
    )
    .unwrap();
    assert_eq!(extra.near_top_threshold, Some(40.0));

    let options = extra.into_options(Some("#feed".to_owned()));
    assert_eq!(options.near_top_threshold, 40.0);
    assert_eq!(options.item_id_attribute, "data-bzr-id");
    assert_eq!(options.threshold, 0.0);
    assert_eq!(options.scroll_ancestor_selector(), Some("#feed"));
}

#[test]
fn empty_js_options_are_engine_defaults() {
    let extra: WebScrollerOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(extra, WebScrollerOptions::default());

    let options = extra.into_options(Some(String::new()));
    assert_eq!(options.item_id_attribute, DEFAULT_ITEM_ID_ATTRIBUTE);
    assert_eq!(options.near_top_threshold, DEFAULT_NEAR_TOP_THRESHOLD);
    assert_eq!(options.scroll_ancestor_selector(), None);
}

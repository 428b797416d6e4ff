#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use infinite_viewport_web::VirtualScroller;
use js_sys::{Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn list_with_items(count: usize) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let list = document.create_element("div").unwrap();
    for i in 1..=count {
        let item = document.create_element("div").unwrap();
        item.set_attribute("data-item-id", &i.to_string()).unwrap();
        item.set_attribute("style", "height: 20px").unwrap();
        list.append_child(&item).unwrap();
    }
    document.body().unwrap().append_child(&list).unwrap();
    list
}

fn js_fn(f: impl FnMut(JsValue, JsValue) + 'static) -> Function {
    let closure = Closure::<dyn FnMut(JsValue, JsValue)>::new(f);
    let function = closure.as_ref().unchecked_ref::<Function>().clone();
    closure.forget();
    function
}

fn counting_handler() -> (Function, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let handler = js_fn(move |_, _| counter.set(counter.get() + 1));
    (handler, calls)
}

/// Counts uncaught errors reported on the window, e.g. a call into a freed closure.
fn count_page_errors() -> Rc<Cell<u32>> {
    let errors = Rc::new(Cell::new(0));
    let counter = Rc::clone(&errors);
    let listener = js_fn(move |_, _| counter.set(counter.get() + 1));
    web_sys::window()
        .unwrap()
        .add_event_listener_with_callback("error", &listener)
        .unwrap();
    errors
}

async fn settle() {
    for _ in 0..3 {
        let promise = Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 50)
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }
}

#[wasm_bindgen_test]
async fn initial_report_reaches_the_handler() {
    let list = list_with_items(5);
    let scroller = VirtualScroller::new().unwrap();
    let (handler, calls) = counting_handler();
    scroller
        .init(None, list, "feed".to_owned(), handler, JsValue::UNDEFINED)
        .unwrap();
    assert_eq!(scroller.observe_new_items("feed".to_owned()).unwrap(), 5);

    settle().await;
    assert_eq!(calls.get(), 1);
    assert_eq!(
        scroller.visible_item_ids("feed".to_owned()).unwrap(),
        vec!["1", "2", "3", "4", "5"]
    );
}

#[wasm_bindgen_test]
async fn disposing_from_a_handler_drops_the_other_scrollers_queued_batch() {
    let errors = count_page_errors();
    let scroller = Rc::new(VirtualScroller::new().unwrap());

    // Both observers get their initial entries in the same rendering update. The first
    // handler runs in the microtask checkpoint between the two observer callbacks.
    let disposer = Rc::clone(&scroller);
    let first = js_fn(move |_, _| {
        let _ = disposer.dispose("second".to_owned());
    });
    let (second, second_calls) = counting_handler();

    let a = list_with_items(3);
    let b = list_with_items(3);
    scroller
        .init(None, a, "first".to_owned(), first, JsValue::UNDEFINED)
        .unwrap();
    scroller
        .init(None, b, "second".to_owned(), second, JsValue::UNDEFINED)
        .unwrap();
    scroller.observe_new_items("first".to_owned()).unwrap();
    scroller.observe_new_items("second".to_owned()).unwrap();

    settle().await;
    assert_eq!(second_calls.get(), 0);
    assert_eq!(errors.get(), 0);
    assert!(scroller.visible_item_ids("second".to_owned()).is_err());
}

#[wasm_bindgen_test]
async fn dispose_after_init_removes_markers_and_stays_silent() {
    let list = list_with_items(4);
    let scroller = VirtualScroller::new().unwrap();
    let (handler, calls) = counting_handler();
    scroller
        .init(None, list.clone(), "feed".to_owned(), handler, JsValue::UNDEFINED)
        .unwrap();
    scroller.observe_new_items("feed".to_owned()).unwrap();
    scroller.dispose("feed".to_owned()).unwrap();

    settle().await;
    assert_eq!(calls.get(), 0);
    let first = list.first_element_child().unwrap();
    assert!(!first.has_attribute("data-viewport-observed"));
}

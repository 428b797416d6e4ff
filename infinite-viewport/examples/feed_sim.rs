// Example: a host loop growing an infinite feed in both directions on the headless platform.
use std::cell::RefCell;
use std::rc::Rc;

use infinite_viewport::headless::{HeadlessPlatform, NodeId};
use infinite_viewport::{Dom, ItemId, Registry, ScrollAncestor, ScrollerError, ScrollerOptions};

const PAGE: i64 = 10;
const ROW: f64 = 48.0;

#[derive(Clone, Copy, Debug)]
enum Direction {
    Up,
    Down,
}

/// Produces `PAGE` ids next to `anchor` in `direction`, nearest first.
fn load_page(anchor: i64, direction: Direction) -> Vec<i64> {
    match direction {
        Direction::Down => (anchor + 1..=anchor + PAGE).collect(),
        Direction::Up => (anchor - PAGE..anchor).rev().collect(),
    }
}

fn render(p: &HeadlessPlatform, id: i64) -> NodeId {
    p.create_item(&id.to_string(), ROW)
}

fn run() -> Result<(), ScrollerError> {
    let p = HeadlessPlatform::new(480.0);
    let container = p.create_element();
    p.append_child(p.body(), container);
    for id in 1..=2 * PAGE {
        p.append_child(container, render(&p, id));
    }

    let latest: Rc<RefCell<Vec<ItemId>>> = Rc::default();
    let sink = Rc::clone(&latest);
    let options = ScrollerOptions::new().with_on_viewport_changed(move |_: &u64, ids: &[ItemId]| {
        sink.replace(ids.to_vec());
        Ok(())
    });

    let mut reg: Registry<HeadlessPlatform> = Registry::new(p.clone());
    reg.create(1, container, options)?;

    let mut first = 1i64;
    let mut last = 2 * PAGE;
    let viewport = ScrollAncestor::Viewport;
    let steps = [300.0, 600.0, 900.0, 1400.0, 0.0];

    for target in steps {
        p.scroll_to(&viewport, target);
        reg.observe_new_items(&1)?;
        p.deliver_intersections(&mut reg);

        let visible = latest.borrow().clone();
        let Some(top) = visible.iter().filter_map(|s| s.parse::<i64>().ok()).min() else {
            continue;
        };
        let bottom = visible
            .iter()
            .filter_map(|s| s.parse::<i64>().ok())
            .max()
            .unwrap_or(top);

        if last - bottom < 3 {
            let nudged = reg.ensure_not_at_bottom(&1)?;
            println!("appending below, nudged={nudged}");
            for id in load_page(last, Direction::Down) {
                p.append_child(container, render(&p, id));
                last = id;
            }
        } else if top - first < 3 {
            let ids = load_page(first, Direction::Up);
            let nodes: Vec<NodeId> = ids.iter().rev().map(|&id| render(&p, id)).collect();
            p.prepend_children(container, &nodes);
            first = ids.last().copied().unwrap_or(first);
            let compensated = reg.compensate_for_prepended_items(&1, nodes.len())?;
            println!("prepended {} items, compensated={compensated}", nodes.len());
        }

        println!(
            "scroll_top={:>6.1} visible={:?} window={}..={}",
            p.scroll_geometry(&viewport).scroll_top,
            visible,
            first,
            last
        );
    }

    reg.dispose(&1)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("feed_sim failed: {err}");
    }
}

use crate::{Dom, ScrollAncestor};

/// Sum of the outer heights of the first `count` children of `container`.
///
/// Children that are no longer laid out count as zero; missing children (fewer than `count`)
/// contribute nothing.
pub fn leading_items_height<D: Dom>(dom: &D, container: &D::Element, count: usize) -> u64 {
    let children = dom.children(container);
    if children.len() < count {
        vwarn!(
            requested = count,
            available = children.len(),
            "fewer leading items than requested"
        );
    }
    children
        .iter()
        .take(count)
        .map(|child| match dom.element_box(child) {
            Some(b) => b.outer_height() as u64,
            None => {
                vdebug!("leading item is not laid out; counted as zero height");
                0
            }
        })
        .sum()
}

/// Keeps the visible content in place after `count` items were prepended to `container`.
///
/// Only runs while `ancestor` is scrolled less than `near_top_threshold` pixels; further down the
/// prepended items are off-screen and there is no shift to correct. Returns whether the scroll
/// offset was adjusted.
pub fn compensate_for_prepended_items<D: Dom>(
    dom: &D,
    ancestor: &ScrollAncestor<D::Element>,
    container: &D::Element,
    count: usize,
    near_top_threshold: f64,
) -> bool {
    if count == 0 {
        return false;
    }
    let geometry = dom.scroll_geometry(ancestor);
    if geometry.scroll_top >= near_top_threshold {
        vtrace!(
            scroll_top = geometry.scroll_top,
            near_top_threshold,
            "prepend compensation skipped"
        );
        return false;
    }

    let height = leading_items_height(dom, container, count);
    vtrace!(count, height, scroll_top = geometry.scroll_top, "prepend compensation");
    if height > 0 {
        dom.scroll_by(ancestor, height as f64);
    }
    true
}

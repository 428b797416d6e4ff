use crate::{Dom, ScrollAncestor};

/// Moves `ancestor` back by `nudge` pixels when it is scrolled to the very bottom.
///
/// Some engines keep a container pinned to the bottom while content is appended below it.
/// Stepping off the last pixel breaks that pinning. Content that does not overflow
/// (`scroll_top == 0`) is left alone. Returns whether the offset was changed.
pub fn ensure_not_at_bottom<D: Dom>(
    dom: &D,
    ancestor: &ScrollAncestor<D::Element>,
    epsilon: f64,
    nudge: f64,
) -> bool {
    let geometry = dom.scroll_geometry(ancestor);
    if geometry.scroll_top <= 0.0 || !geometry.is_at_bottom(epsilon) {
        return false;
    }
    vtrace!(
        scroll_top = geometry.scroll_top,
        scroll_height = geometry.scroll_height,
        nudge,
        "nudging off bottom"
    );
    dom.scroll_by(ancestor, -nudge);
    true
}

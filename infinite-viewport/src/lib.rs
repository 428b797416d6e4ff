//! A headless viewport-tracking and scroll-anchoring engine for infinite lists.
//!
//! An infinite list keeps a small window of rendered items inside a scroll container and loads
//! more as the user nears either edge. This crate is the part that sits between the rendered
//! items and the host deciding what to load:
//!
//! - [`VisibilityTracker`]: which items currently intersect the scroll root, reported as one
//!   full, ordered id list per change.
//! - [`compensate_for_prepended_items`]: keeps the view still when items are inserted above it.
//! - [`ensure_not_at_bottom`]: steps off the last pixel so appends do not auto-follow.
//! - [`Registry`]: owns any number of independent scroller instances, addressed by id.
//!
//! It is platform-agnostic. A UI layer implements [`Platform`] (see the
//! `infinite-viewport-web` crate for the browser) or uses [`headless::HeadlessPlatform`] for
//! tests and simulations.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod anchor;
mod error;
mod guard;
pub mod headless;
mod key;
mod options;
mod platform;
mod registry;
mod scroller;
mod tracker;
mod types;


pub use anchor::{compensate_for_prepended_items, leading_items_height};
pub use error::{DeliveryError, ScrollerError};
pub use guard::ensure_not_at_bottom;
pub use key::InstanceKey;
pub use options::{
    DEFAULT_BOTTOM_EPSILON, DEFAULT_BOTTOM_NUDGE, DEFAULT_ITEM_ID_ATTRIBUTE,
    DEFAULT_NEAR_TOP_THRESHOLD, DEFAULT_WATCHED_ATTRIBUTE, OnViewportChanged, ScrollerOptions,
};
pub use platform::{Dom, IntersectionObserver, Platform};
pub use registry::{Registry, ScrollerFor};
pub use scroller::Scroller;
pub use tracker::VisibilityTracker;
pub use types::{
    ElementBox, IntersectionEntry, ItemId, ScrollAncestor, ScrollGeometry, VisibleItems,
};

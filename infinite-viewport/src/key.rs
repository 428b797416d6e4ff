use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

pub(crate) type InstanceMap<I, V> = HashMap<I, V>;

/// Identity of a scroller instance inside a [`crate::Registry`].
///
/// Any cheap-to-clone, hashable value works: an index, a pointer-sized handle, or a string
/// handed over from a host runtime.
pub trait InstanceKey: Hash + Eq + Clone + Debug {}
impl<T: Hash + Eq + Clone + Debug> InstanceKey for T {}

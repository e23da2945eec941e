//! Lightweight handles into the graph arenas.
//!
//! Graphs own their nodes and edges in flat vectors; everything else refers to
//! them through these `Copy` handles. A handle is only meaningful for the graph
//! that produced it.

use std::fmt::{Display, Formatter};

/// Handle to an activity node of an [`ActivityTransitionGraph`][crate::atg::ActivityTransitionGraph].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ActivityId(u32);

/// Handle to a stack node of an [`ActivityStackTransitionGraph`][crate::astg::ActivityStackTransitionGraph].
///
/// Ids are handed out sequentially, in the order the stacks are first encountered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct StackId(u32);

/// Handle to a merged edge of an [`ActivityStackTransitionGraph`][crate::astg::ActivityStackTransitionGraph].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

macro_rules! impl_handle {
    ($name:ident, $prefix:literal) => {
        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Return the raw value of the handle.
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Return the index for arena access.
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                assert!(index <= u32::MAX as usize, "Arena index {} overflows u32", index);
                Self(index as u32)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

impl_handle!(ActivityId, "a");
impl_handle!(StackId, "s");
impl_handle!(EdgeId, "e");

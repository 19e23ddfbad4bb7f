//! Bookkeeping for arcs cut at an interior point.
//!
//! When a query location falls in the middle of an arc, the builder replaces
//! the arc with two synthetic halves joined at a new node.  The records below
//! remember what was replaced so that paths over the halves can be reported
//! against the original arc id.

use nf_core::{ArcId, ExtId, NodeId};

/// An original arc that was cut in two.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplittedArc {
    /// External id of the arc that was cut.
    pub ext_id: ExtId,
    /// Node inserted at the cut.
    pub node:   NodeId,
    /// Position of the cut as a fraction of the way from the original arc's
    /// start node, strictly between 0 and 1.
    pub ratio:  f64,
    /// Synthetic arcs incident to `node` that replace the original, ascending.
    pub arcs:   Vec<ArcId>,
}

/// One directed arc removed by a split, with the attributes it had.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwappedOldArc {
    pub ext_id:   ExtId,
    pub from:     NodeId,
    pub to:       NodeId,
    pub cost:     f64,
    pub capacity: f64,
}

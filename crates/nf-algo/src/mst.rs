//! Minimum spanning forests.
//!
//! Prim's algorithm, started from the lowest-numbered unvisited node of each
//! component.  Direction is ignored: an arc connects its endpoints both ways.
//! Each non-tree node keeps its cheapest connecting arc in the heap under the
//! key `(cost, arc id)`, so equal-cost candidates resolve to the lowest arc
//! id and the forest is unique for a given network.
//!
//! [`SpanningTreeEngine::solve_component`] grows a single tree from a chosen
//! root and leaves the rest of the network alone.

use nf_core::{ArcId, NfError, NfResult, NodeId};
use nf_net::InternalNet;

use crate::heap::{DaryHeap, ItemState};

/// A minimum spanning forest.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MstResult {
    /// Selected arcs, ascending.
    pub arcs:       Vec<ArcId>,
    pub total_cost: f64,
    /// Connected components, isolated nodes included.
    pub tree_count: usize,
}

/// Spanning-tree capability.
pub trait SpanningTreeEngine: Send {
    /// Spanning forest of the whole network.
    fn solve(&mut self, net: &InternalNet) -> NfResult<MstResult>;

    /// Spanning tree of the component containing `root`.  `tree_count` is 1.
    fn solve_component(&mut self, net: &InternalNet, root: NodeId) -> NfResult<MstResult>;
}

/// Prim over an indexed d-ary heap.
pub struct PrimMst {
    heap:     DaryHeap,
    best_arc: Vec<ArcId>,
}

impl PrimMst {
    pub fn new() -> Self {
        Self { heap: DaryHeap::new(4), best_arc: Vec::new() }
    }

    fn relax(&mut self, net: &InternalNet, u: NodeId) {
        let costs = net.costs();
        let out = net.out_arcs(u).map(|a| (a, net.arc_target(a)));
        let inc = net.in_arcs(u).map(|a| (a, net.arc_source(a)));
        for (arc, other) in out.chain(inc) {
            if other == u || self.heap.state(other.index()) == ItemState::Popped {
                continue;
            }
            let key = (costs[arc.index()], arc.0 as u64);
            if self.heap.push_or_decrease(other.index(), key) {
                self.best_arc[other.index()] = arc;
            }
        }
    }

    fn prepare(&mut self, net: &InternalNet) -> NfResult<()> {
        net.check_nonnegative_costs()?;
        let n = net.node_count();
        self.heap.reset(n);
        self.best_arc.clear();
        self.best_arc.resize(n, ArcId::INVALID);
        Ok(())
    }

    /// Grow one tree from `root`, appending its arcs.  Returns the tree cost.
    fn grow(&mut self, net: &InternalNet, root: NodeId, arcs: &mut Vec<ArcId>) -> f64 {
        let mut cost = 0.0;
        // The root enters with a key below every arc key.
        self.heap.push_or_decrease(root.index(), (f64::NEG_INFINITY, 0));

        while let Some((u, _)) = self.heap.pop() {
            let arc = self.best_arc[u];
            if arc.is_valid() {
                arcs.push(arc);
                cost += net.arc_cost(arc);
            }
            self.relax(net, NodeId(u as u32));
        }
        cost
    }
}

impl Default for PrimMst {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanningTreeEngine for PrimMst {
    fn solve(&mut self, net: &InternalNet) -> NfResult<MstResult> {
        self.prepare(net)?;

        let mut arcs = Vec::with_capacity(net.node_count().saturating_sub(1));
        let mut total_cost = 0.0;
        let mut tree_count = 0;

        for root in net.nodes() {
            if self.heap.state(root.index()) != ItemState::Unseen {
                continue;
            }
            tree_count += 1;
            total_cost += self.grow(net, root, &mut arcs);
        }

        arcs.sort_unstable();
        Ok(MstResult { arcs, total_cost, tree_count })
    }

    fn solve_component(&mut self, net: &InternalNet, root: NodeId) -> NfResult<MstResult> {
        if !net.contains_node(root) {
            return Err(NfError::unknown_node(root));
        }
        self.prepare(net)?;

        let mut arcs = Vec::new();
        let total_cost = self.grow(net, root, &mut arcs);
        arcs.sort_unstable();
        Ok(MstResult { arcs, total_cost, tree_count: 1 })
    }
}

//! Shortest-path trees.
//!
//! # Algorithm
//!
//! Label-setting Dijkstra over non-negative arc costs.  Temporary labels sit
//! in an indexed [`DaryHeap`] keyed by `(distance, discovery sequence)`: of
//! two nodes at equal distance the one discovered first becomes permanent
//! first, and a label is only replaced by a strictly shorter one.  Results
//! are therefore identical across runs and heap arities.
//!
//! # Termination
//!
//! | Condition                                  | Stops when                               |
//! |--------------------------------------------|------------------------------------------|
//! | no destinations                            | frontier exhausted                       |
//! | destinations, `StopRule::AllDestinations`  | every destination permanent              |
//! | destinations, `StopRule::FirstReached`     | first destination permanent              |
//! | cutoff `c`                                 | next candidate's distance exceeds `c`    |
//!
//! Only permanent labels are reported; everything else reads as unreached.
//! [`SptResult::stopped_early`] tells a stop-rule cut apart from a search
//! that ran out of frontier.

use nf_core::{ArcId, MalformedInput, NfError, NfResult, NodeId, StopRule, config::auto_heap_arity};
use nf_net::InternalNet;

use crate::heap::{DaryHeap, ItemState};

// ── Query ─────────────────────────────────────────────────────────────────────

/// One single-origin search request.
#[derive(Clone, Debug, PartialEq)]
pub struct SptQuery {
    pub origin:       NodeId,
    /// Empty means every node.
    pub destinations: Vec<NodeId>,
    /// Inclusive upper bound on reported distances.
    pub cutoff:       Option<f64>,
    pub stop_rule:    StopRule,
}

impl SptQuery {
    /// Search from `origin` to every node.
    pub fn to_all(origin: NodeId) -> Self {
        Self { origin, destinations: Vec::new(), cutoff: None, stop_rule: StopRule::AllDestinations }
    }

    /// Search from `origin` to `destinations`.
    pub fn to_many(origin: NodeId, destinations: Vec<NodeId>) -> Self {
        Self { destinations, ..Self::to_all(origin) }
    }

    /// Search from `origin` to a single destination.
    pub fn to_one(origin: NodeId, dest: NodeId) -> Self {
        Self::to_many(origin, vec![dest])
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.stop_rule = stop_rule;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Permanent labels of one search, indexed by `NodeId`.
#[derive(Clone, Debug)]
pub struct SptResult {
    origin:        NodeId,
    dist:          Vec<f64>,
    pred_arc:      Vec<ArcId>,
    pred_node:     Vec<NodeId>,
    /// Nodes in the order they became permanent.
    settled:       Vec<NodeId>,
    /// `StopRule::FirstReached` ended the search with destinations left.
    stopped_early: bool,
}

impl SptResult {
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Least cost from the origin, or `None` if `node` was not reached.
    #[inline]
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        let d = *self.dist.get(node.index())?;
        d.is_finite().then_some(d)
    }

    #[inline]
    pub fn is_reached(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Arc through which `node` was reached; `None` for the origin and for
    /// unreached nodes.
    pub fn pred_arc(&self, node: NodeId) -> Option<ArcId> {
        let a = *self.pred_arc.get(node.index())?;
        a.is_valid().then_some(a)
    }

    pub fn pred_node(&self, node: NodeId) -> Option<NodeId> {
        let n = *self.pred_node.get(node.index())?;
        n.is_valid().then_some(n)
    }

    /// Arcs from the origin to `node`, in travel order.
    pub fn path_arcs(&self, node: NodeId) -> Option<Vec<ArcId>> {
        self.distance(node)?;
        let mut arcs = Vec::new();
        let mut cur = node;
        while let (Some(a), Some(p)) = (self.pred_arc(cur), self.pred_node(cur)) {
            arcs.push(a);
            cur = p;
        }
        arcs.reverse();
        Some(arcs)
    }

    /// Nodes from the origin to `node` inclusive.
    pub fn path_nodes(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.distance(node)?;
        let mut nodes = vec![node];
        let mut cur = node;
        while let Some(p) = self.pred_node(cur) {
            nodes.push(p);
            cur = p;
        }
        nodes.reverse();
        Some(nodes)
    }

    /// `true` when `StopRule::FirstReached` ended the search while other
    /// destinations were still temporary.  Those destinations read as
    /// unreached here but may have a path.
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    /// Permanent nodes in settle order (ascending distance).
    pub fn settled(&self) -> &[NodeId] {
        &self.settled
    }

    pub fn reached_count(&self) -> usize {
        self.settled.len()
    }

    /// Distances indexed by `NodeId`; `f64::INFINITY` marks unreached nodes.
    pub fn distances(&self) -> &[f64] {
        &self.dist
    }
}

// ── ShortestPathEngine trait ──────────────────────────────────────────────────

/// Single-origin shortest-path capability.
///
/// Engines own their working buffers, so one engine serves one thread; batch
/// solvers create one per worker.  Every call starts from clean labels.
pub trait ShortestPathEngine: Send {
    fn solve(&mut self, net: &InternalNet, query: &SptQuery) -> NfResult<SptResult>;
}

// ── DijkstraSpt ───────────────────────────────────────────────────────────────

/// Dijkstra with an indexed d-ary heap.
pub struct DijkstraSpt {
    /// `None` picks `arcs / nodes` per network.
    arity:     Option<usize>,
    heap:      DaryHeap,
    dist:      Vec<f64>,
    pred_arc:  Vec<ArcId>,
    pred_node: Vec<NodeId>,
    is_dest:   Vec<bool>,
}

impl DijkstraSpt {
    /// Engine with automatic heap arity.
    pub fn new() -> Self {
        Self::with_arity(None)
    }

    pub fn with_arity(arity: Option<usize>) -> Self {
        Self {
            arity,
            heap: DaryHeap::new(arity.unwrap_or(2)),
            dist: Vec::new(),
            pred_arc: Vec::new(),
            pred_node: Vec::new(),
            is_dest: Vec::new(),
        }
    }

    /// Heap arity used for the most recent solve.
    pub fn current_arity(&self) -> usize {
        self.heap.arity()
    }

    fn reset(&mut self, net: &InternalNet) {
        let n = net.node_count();
        let arity = self
            .arity
            .unwrap_or_else(|| auto_heap_arity(net.arc_count(), n));
        self.heap.reset(n);
        self.heap.set_arity(arity);

        self.dist.clear();
        self.dist.resize(n, f64::INFINITY);
        self.pred_arc.clear();
        self.pred_arc.resize(n, ArcId::INVALID);
        self.pred_node.clear();
        self.pred_node.resize(n, NodeId::INVALID);
        self.is_dest.clear();
        self.is_dest.resize(n, false);
    }
}

impl Default for DijkstraSpt {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortestPathEngine for DijkstraSpt {
    fn solve(&mut self, net: &InternalNet, query: &SptQuery) -> NfResult<SptResult> {
        validate_query(net, query)?;
        net.check_nonnegative_costs()?;
        self.reset(net);

        let mut remaining = 0usize;
        for &d in &query.destinations {
            if !self.is_dest[d.index()] {
                self.is_dest[d.index()] = true;
                remaining += 1;
            }
        }
        let targeted = remaining > 0;
        let cutoff = query.cutoff.unwrap_or(f64::INFINITY);

        let costs = net.costs();
        let targets = net.targets();
        let mut seq: u64 = 0;
        let mut settled = Vec::new();
        let mut stopped_early = false;

        self.dist[query.origin.index()] = 0.0;
        self.heap.push_or_decrease(query.origin.index(), (0.0, seq));

        while let Some((u, (du, _))) = self.heap.pop() {
            if du > cutoff {
                break;
            }
            let node = NodeId(u as u32);
            settled.push(node);

            if targeted && self.is_dest[u] {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
                if query.stop_rule == StopRule::FirstReached {
                    stopped_early = true;
                    break;
                }
            }

            for arc in net.out_arcs(node) {
                let v = targets[arc.index()].index();
                if self.heap.state(v) == ItemState::Popped {
                    continue;
                }
                let nd = du + costs[arc.index()];
                if nd < self.dist[v] {
                    let tie = match self.heap.state(v) {
                        ItemState::InHeap => self.heap.key(v).1,
                        _ => {
                            seq += 1;
                            seq
                        }
                    };
                    self.dist[v] = nd;
                    self.pred_arc[v] = arc;
                    self.pred_node[v] = node;
                    self.heap.push_or_decrease(v, (nd, tie));
                }
            }
        }

        // Keep permanent labels only.
        let n = net.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut pred_arc = vec![ArcId::INVALID; n];
        let mut pred_node = vec![NodeId::INVALID; n];
        for &s in &settled {
            dist[s.index()] = self.dist[s.index()];
            pred_arc[s.index()] = self.pred_arc[s.index()];
            pred_node[s.index()] = self.pred_node[s.index()];
        }

        Ok(SptResult { origin: query.origin, dist, pred_arc, pred_node, settled, stopped_early })
    }
}

fn validate_query(net: &InternalNet, query: &SptQuery) -> NfResult<()> {
    if !net.contains_node(query.origin) {
        return Err(NfError::unknown_node(query.origin));
    }
    if let Some(&bad) = query.destinations.iter().find(|d| !net.contains_node(**d)) {
        return Err(NfError::unknown_node(bad));
    }
    if let Some(c) = query.cutoff {
        if c.is_nan() || c < 0.0 {
            return Err(MalformedInput::InvalidCutoff(c).into());
        }
    }
    Ok(())
}

//! The `InternalNet` graph store.
//!
//! # Data layout
//!
//! Arc attributes live in structure-of-arrays form indexed by `ArcId`, where
//! an arc's id is its insertion order.  Adjacency is kept in two CSR indices:
//!
//! ```text
//! out_arcs[ out_start[n] .. out_start[n+1] ]   arcs leaving n
//! in_arcs [ in_start[n]  .. in_start[n+1]  ]   arcs entering n
//! ```
//!
//! Both index slices are sorted by `ArcId`, so every traversal visits arcs in
//! a deterministic order.
//!
//! # Identifiers
//!
//! External node ids map to `NodeId` through an `FxHashMap` (a bijection).
//! External arc ids may repeat: an undirected road is two arcs sharing one
//! id.  Arcs created by splitting carry no id of their own; the split
//! records translate them back to the id of the arc they replaced.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over every node that has a position, used to
//! snap query points to the network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use nf_core::{
    ArcId, ExtId, FlowInstanceType, GeoPoint, MalformedInput, NfError, NfResult, NodeId,
};

use crate::split::{SplittedArc, SwappedOldArc};

// ── ArcData ───────────────────────────────────────────────────────────────────

/// Attributes of one directed arc, as handed to the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcData {
    /// `None` for synthetic arcs.
    pub ext_id:   Option<ExtId>,
    pub cost:     f64,
    /// `f64::INFINITY` means unconstrained.
    pub capacity: f64,
}

impl ArcData {
    /// An unnamed, uncapacitated arc.
    pub fn new(cost: f64) -> Self {
        Self { ext_id: None, cost, capacity: f64::INFINITY }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ext_id(mut self, id: impl Into<ExtId>) -> Self {
        self.ext_id = Some(id.into());
        self
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct NodeEntry {
    pub(crate) point: [f64; 2], // [lat, lon]
    pub(crate) id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// nearest node within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── InternalNet ───────────────────────────────────────────────────────────────

/// Directed network with cost, capacity and supply attributes.
///
/// Immutable once built (apart from dropping split records); solvers share
/// `&InternalNet` freely across threads.  Construct with
/// [`InternalNetBuilder`](crate::InternalNetBuilder).
#[derive(Clone)]
pub struct InternalNet {
    // ── Node data ─────────────────────────────────────────────────────────
    pub(crate) node_ext:    Vec<ExtId>,
    pub(crate) node_supply: Vec<f64>,
    pub(crate) node_pos:    Vec<Option<GeoPoint>>,
    pub(crate) node_index:  FxHashMap<ExtId, NodeId>,

    // ── Arc data (indexed by ArcId) ───────────────────────────────────────
    pub(crate) arc_from: Vec<NodeId>,
    pub(crate) arc_to:   Vec<NodeId>,
    pub(crate) arc_cost: Vec<f64>,
    pub(crate) arc_cap:  Vec<f64>,
    pub(crate) arc_ext:  Vec<Option<ExtId>>,
    pub(crate) arc_index: FxHashMap<ExtId, Vec<ArcId>>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    pub(crate) out_start: Vec<u32>,
    pub(crate) out_arcs:  Vec<ArcId>,
    pub(crate) in_start:  Vec<u32>,
    pub(crate) in_arcs:   Vec<ArcId>,

    // ── Split bookkeeping ─────────────────────────────────────────────────
    pub(crate) splits:        Vec<SplittedArc>,
    pub(crate) swapped:       Vec<SwappedOldArc>,
    pub(crate) split_origins: FxHashMap<ArcId, ExtId>,

    // ── Cached input checks ───────────────────────────────────────────────
    pub(crate) first_bad_cost:     Option<ArcId>,
    pub(crate) first_negative_cost: Option<ArcId>,
    pub(crate) first_bad_capacity: Option<ArcId>,

    pub(crate) spatial_idx: RTree<NodeEntry>,
}

impl InternalNet {
    /// Construct an empty network with no nodes or arcs.
    pub fn empty() -> Self {
        crate::InternalNetBuilder::new().assemble()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_ext.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ext.is_empty()
    }

    // ── Lazy sequences ────────────────────────────────────────────────────

    /// All node ids in ascending order.  Each call starts a fresh traversal.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    /// All arc ids in ascending order.
    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arc_count() as u32).map(ArcId)
    }

    /// Arcs leaving `node`, ascending by id.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        self.out_arcs[start..end].iter().copied()
    }

    /// Arcs entering `node`, ascending by id.
    #[inline]
    pub fn in_arcs(&self, node: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        let start = self.in_start[node.index()] as usize;
        let end   = self.in_start[node.index() + 1] as usize;
        self.in_arcs[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.out_start[node.index() + 1] - self.out_start[node.index()]) as usize
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        (self.in_start[node.index() + 1] - self.in_start[node.index()]) as usize
    }

    // ── Attribute maps (borrowed, never copied) ───────────────────────────

    /// Arc costs indexed by `ArcId`.
    #[inline]
    pub fn costs(&self) -> &[f64] {
        &self.arc_cost
    }

    /// Arc capacities indexed by `ArcId`.
    #[inline]
    pub fn capacities(&self) -> &[f64] {
        &self.arc_cap
    }

    /// Node supplies indexed by `NodeId`.
    #[inline]
    pub fn supplies(&self) -> &[f64] {
        &self.node_supply
    }

    /// Arc sources indexed by `ArcId`.
    #[inline]
    pub fn sources(&self) -> &[NodeId] {
        &self.arc_from
    }

    /// Arc targets indexed by `ArcId`.
    #[inline]
    pub fn targets(&self) -> &[NodeId] {
        &self.arc_to
    }

    // ── Per-element access ────────────────────────────────────────────────

    #[inline]
    pub fn arc_source(&self, arc: ArcId) -> NodeId {
        self.arc_from[arc.index()]
    }

    #[inline]
    pub fn arc_target(&self, arc: ArcId) -> NodeId {
        self.arc_to[arc.index()]
    }

    #[inline]
    pub fn arc_cost(&self, arc: ArcId) -> f64 {
        self.arc_cost[arc.index()]
    }

    #[inline]
    pub fn arc_capacity(&self, arc: ArcId) -> f64 {
        self.arc_cap[arc.index()]
    }

    #[inline]
    pub fn supply(&self, node: NodeId) -> f64 {
        self.node_supply[node.index()]
    }

    /// The arc's own external id; `None` for synthetic arcs.
    pub fn arc_ext_id(&self, arc: ArcId) -> Option<&ExtId> {
        self.arc_ext[arc.index()].as_ref()
    }

    /// All attributes of `arc` as builder input (used to copy networks).
    pub fn arc_data(&self, arc: ArcId) -> ArcData {
        ArcData {
            ext_id:   self.arc_ext[arc.index()].clone(),
            cost:     self.arc_cost[arc.index()],
            capacity: self.arc_cap[arc.index()],
        }
    }

    pub fn node_ext_id(&self, node: NodeId) -> &ExtId {
        &self.node_ext[node.index()]
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    pub fn contains_arc(&self, arc: ArcId) -> bool {
        arc.index() < self.arc_count()
    }

    // ── Identifier resolution ─────────────────────────────────────────────

    /// Resolve an external node id.
    pub fn node(&self, ext: &str) -> NfResult<NodeId> {
        self.node_index
            .get(ext)
            .copied()
            .ok_or_else(|| NfError::unknown_node(ext))
    }

    /// Resolve many external node ids, keeping order.  Fails on the first
    /// unknown id.
    pub fn resolve_nodes<S: AsRef<str>>(&self, ids: &[S]) -> NfResult<Vec<NodeId>> {
        ids.iter().map(|id| self.node(id.as_ref())).collect()
    }

    /// Lowest arc carrying external id `ext`.
    pub fn arc(&self, ext: &str) -> NfResult<ArcId> {
        self.arc_index
            .get(ext)
            .and_then(|arcs| arcs.first().copied())
            .ok_or_else(|| NfError::unknown_arc(ext))
    }

    /// Every arc carrying external id `ext` (both halves of an undirected
    /// road), ascending.
    pub fn arcs_with_ext_id(&self, ext: &str) -> &[ArcId] {
        self.arc_index.get(ext).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lowest arc from `from` to `to`, if any.
    pub fn arc_between(&self, from: NodeId, to: NodeId) -> Option<ArcId> {
        self.out_arcs(from).find(|&a| self.arc_to[a.index()] == to)
    }

    /// Translate a path to the external ids of the original arcs it uses.
    ///
    /// Synthetic arcs from splitting are reported under the id of the arc
    /// they replaced; other unnamed arcs are skipped.  Consecutive repeats
    /// (two halves of one split arc) collapse into one entry.
    pub fn original_arc_ids(&self, path: &[ArcId]) -> Vec<ExtId> {
        let mut out: Vec<ExtId> = Vec::with_capacity(path.len());
        for &arc in path {
            let id = match self.arc_ext[arc.index()].as_ref() {
                Some(id) if !id.is_empty() => Some(id),
                _ => self.split_origins.get(&arc),
            };
            if let Some(id) = id {
                if out.last() != Some(id) {
                    out.push(id.clone());
                }
            }
        }
        out
    }

    // ── Supply accounting ─────────────────────────────────────────────────

    /// Sum of positive supplies.
    pub fn total_supply(&self) -> f64 {
        self.node_supply.iter().filter(|&&s| s > 0.0).sum()
    }

    /// Sum of negative supplies, as a positive number.
    pub fn total_demand(&self) -> f64 {
        -self.node_supply.iter().filter(|&&s| s < 0.0).sum::<f64>()
    }

    pub fn instance_type(&self) -> FlowInstanceType {
        FlowInstanceType::classify(self.total_supply(), self.total_demand())
    }

    // ── Entry checks ──────────────────────────────────────────────────────

    /// Reject non-finite or negative arc costs.
    pub fn check_nonnegative_costs(&self) -> NfResult<()> {
        self.check_finite_costs()?;
        if let Some(arc) = self.first_negative_cost {
            let cost = self.arc_cost[arc.index()];
            return Err(MalformedInput::NegativeCost { arc, cost }.into());
        }
        Ok(())
    }

    /// Reject NaN or infinite arc costs.
    pub fn check_finite_costs(&self) -> NfResult<()> {
        if let Some(arc) = self.first_bad_cost {
            let cost = self.arc_cost[arc.index()];
            return Err(MalformedInput::NonFiniteCost { arc, cost }.into());
        }
        Ok(())
    }

    /// Reject negative or NaN capacities.
    pub fn check_capacities(&self) -> NfResult<()> {
        if let Some(arc) = self.first_bad_capacity {
            let capacity = self.arc_cap[arc.index()];
            return Err(MalformedInput::NegativeCapacity { arc, capacity }.into());
        }
        Ok(())
    }

    // ── Split bookkeeping ─────────────────────────────────────────────────

    pub fn split_records(&self) -> &[SplittedArc] {
        &self.splits
    }

    pub fn swapped_arcs(&self) -> &[SwappedOldArc] {
        &self.swapped
    }

    /// Drop split bookkeeping once results have been translated.  Synthetic
    /// arcs are then reported without an id.
    pub fn clear_split_records(&mut self) {
        self.splits.clear();
        self.swapped.clear();
        self.split_origins.clear();
    }

    // ── Geometry pass-through ─────────────────────────────────────────────

    pub fn node_position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos[node.index()]
    }

    /// Position of the node with external id `ext`.
    pub fn node_geometry(&self, ext: &str) -> NfResult<Option<GeoPoint>> {
        self.node(ext).map(|n| self.node_pos[n.index()])
    }

    /// Start and end positions of `arc`, when both endpoints have one.
    pub fn arc_endpoints(&self, arc: ArcId) -> Option<(GeoPoint, GeoPoint)> {
        let from = self.node_pos[self.arc_from[arc.index()].index()]?;
        let to = self.node_pos[self.arc_to[arc.index()].index()]?;
        Some((from, to))
    }

    /// Nearest positioned node to `pos`.  `None` when no node has a position.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Up to `k` nearest positioned nodes, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

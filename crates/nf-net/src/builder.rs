//! Incremental construction of an [`InternalNet`].

use rstar::RTree;
use rustc_hash::FxHashMap;

use nf_core::{ArcId, ExtId, GeoPoint, MalformedInput, NfError, NfResult, NodeId};

use crate::network::{ArcData, InternalNet, NodeEntry};
use crate::split::{SplittedArc, SwappedOldArc};

/// Construct an [`InternalNet`] incrementally, then call [`build`](Self::build).
///
/// Nodes get sequential `NodeId`s in insertion order.  Arcs get `ArcId`s in
/// insertion order as well, so the arc added first wins every "lowest arc
/// index" tie-break.
///
/// # Example
///
/// ```
/// use nf_net::{ArcData, InternalNetBuilder};
///
/// let mut b = InternalNetBuilder::new();
/// let a = b.add_node("A", 5.0);
/// let z = b.add_node("Z", -5.0);
/// b.add_undirected_arc(a, z, ArcData::new(12.5).with_ext_id("road-1"));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.arc_count(), 2); // one arc per direction
/// ```
pub struct InternalNetBuilder {
    node_ext:    Vec<ExtId>,
    node_supply: Vec<f64>,
    node_pos:    Vec<Option<GeoPoint>>,
    node_index:  FxHashMap<ExtId, NodeId>,
    raw_arcs:    Vec<RawArc>,
    splits:      Vec<PendingSplit>,
    swapped:     Vec<SwappedOldArc>,
}

struct RawArc {
    from:     NodeId,
    to:       NodeId,
    data:     ArcData,
    /// Index into `splits` for synthetic halves.
    split_of: Option<usize>,
}

struct PendingSplit {
    ext_id: ExtId,
    node:   NodeId,
    ratio:  f64,
}

impl InternalNetBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and arcs.
    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        let mut node_index = FxHashMap::default();
        node_index.reserve(nodes);
        Self {
            node_ext: Vec::with_capacity(nodes),
            node_supply: Vec::with_capacity(nodes),
            node_pos: Vec::with_capacity(nodes),
            node_index,
            raw_arcs: Vec::with_capacity(arcs),
            splits: Vec::new(),
            swapped: Vec::new(),
        }
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Add a node and return its `NodeId`.
    ///
    /// If `ext` is already present the existing id is returned and its
    /// attributes are left unchanged; use [`set_supply`](Self::set_supply)
    /// to update them.
    pub fn add_node(&mut self, ext: impl Into<ExtId>, supply: f64) -> NodeId {
        let ext = ext.into();
        if let Some(&id) = self.node_index.get(&ext) {
            return id;
        }
        let id = NodeId(self.node_ext.len() as u32);
        self.node_index.insert(ext.clone(), id);
        self.node_ext.push(ext);
        self.node_supply.push(supply);
        self.node_pos.push(None);
        id
    }

    /// Like [`add_node`](Self::add_node) with a position for snapping and
    /// route geometry.
    pub fn add_node_at(&mut self, ext: impl Into<ExtId>, supply: f64, pos: GeoPoint) -> NodeId {
        let id = self.add_node(ext, supply);
        self.node_pos[id.index()] = Some(pos);
        id
    }

    pub fn set_supply(&mut self, node: NodeId, supply: f64) {
        self.node_supply[node.index()] = supply;
    }

    pub fn set_position(&mut self, node: NodeId, pos: GeoPoint) {
        self.node_pos[node.index()] = Some(pos);
    }

    /// Look up a node added earlier.
    pub fn node(&self, ext: &str) -> Option<NodeId> {
        self.node_index.get(ext).copied()
    }

    pub fn node_count(&self) -> usize { self.node_ext.len() }
    pub fn arc_count(&self) -> usize { self.raw_arcs.len() }

    // ── Arcs ──────────────────────────────────────────────────────────────

    /// Add a **directed** arc from `from` to `to`.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, data: ArcData) {
        self.raw_arcs.push(RawArc { from, to, data, split_of: None });
    }

    /// Add arcs in **both directions** sharing one external id, the usual
    /// model of an undirected road segment.
    pub fn add_undirected_arc(&mut self, a: NodeId, b: NodeId, data: ArcData) {
        self.add_arc(a, b, data.clone());
        self.add_arc(b, a, data);
    }

    /// Add a directed arc between external node ids, creating missing
    /// nodes as transshipment nodes.
    pub fn add_arc_ext(
        &mut self,
        from: impl Into<ExtId>,
        to:   impl Into<ExtId>,
        data: ArcData,
    ) -> (NodeId, NodeId) {
        let from = self.add_node(from, 0.0);
        let to = self.add_node(to, 0.0);
        self.add_arc(from, to, data);
        (from, to)
    }

    // ── Splitting ─────────────────────────────────────────────────────────

    /// Cut every arc carrying external id `arc_ext` at `ratio` (measured from
    /// the start node of the first such arc) and attach a new node `at`.
    ///
    /// Each cut arc is replaced by two unnamed halves whose costs split in
    /// proportion and whose capacities equal the original's.  Both halves
    /// of an undirected pair are cut at the same point.  The new node gets
    /// an interpolated position when both endpoints have one.
    pub fn split_arc(
        &mut self,
        arc_ext: &str,
        ratio:   f64,
        at:      impl Into<ExtId>,
    ) -> NfResult<NodeId> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(MalformedInput::InvalidSplitRatio(ratio).into());
        }
        let at = at.into();
        if self.node_index.contains_key(&at) {
            return Err(NfError::InternalInconsistency(format!(
                "split node `{at}` already exists"
            )));
        }

        let (cut, kept): (Vec<RawArc>, Vec<RawArc>) = std::mem::take(&mut self.raw_arcs)
            .into_iter()
            .partition(|r| r.data.ext_id.as_ref().is_some_and(|id| id.as_str() == arc_ext));
        self.raw_arcs = kept;

        let Some(first) = cut.first() else {
            return Err(NfError::unknown_arc(arc_ext));
        };
        let (start, end) = (first.from, first.to);

        let node = self.add_node(at, 0.0);
        if let (Some(p), Some(q)) = (self.node_pos[start.index()], self.node_pos[end.index()]) {
            self.node_pos[node.index()] = Some(p.lerp(q, ratio));
        }

        let split_idx = self.splits.len();
        let ext_id = ExtId::from(arc_ext);
        for r in cut {
            let head = if r.from == start { ratio } else { 1.0 - ratio };
            let half = |cost: f64| ArcData { ext_id: None, cost, capacity: r.data.capacity };
            self.raw_arcs.push(RawArc {
                from:     r.from,
                to:       node,
                data:     half(r.data.cost * head),
                split_of: Some(split_idx),
            });
            self.raw_arcs.push(RawArc {
                from:     node,
                to:       r.to,
                data:     half(r.data.cost * (1.0 - head)),
                split_of: Some(split_idx),
            });
            self.swapped.push(SwappedOldArc {
                ext_id:   ext_id.clone(),
                from:     r.from,
                to:       r.to,
                cost:     r.data.cost,
                capacity: r.data.capacity,
            });
        }
        self.splits.push(PendingSplit { ext_id, node, ratio });
        Ok(node)
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce an [`InternalNet`].
    ///
    /// Fails with `InternalInconsistency` if an arc references a node that
    /// was never added.
    pub fn build(self) -> NfResult<InternalNet> {
        let n = self.node_ext.len();
        for (i, r) in self.raw_arcs.iter().enumerate() {
            for end in [r.from, r.to] {
                if end.index() >= n {
                    return Err(NfError::InternalInconsistency(format!(
                        "arc {i} references {end}, but the network has {n} nodes"
                    )));
                }
            }
        }
        Ok(self.assemble())
    }

    /// Build without endpoint validation.  Callers guarantee every endpoint
    /// exists.
    pub(crate) fn assemble(self) -> InternalNet {
        let n = self.node_ext.len();
        let raw = self.raw_arcs;

        let arc_from: Vec<NodeId> = raw.iter().map(|r| r.from).collect();
        let arc_to:   Vec<NodeId> = raw.iter().map(|r| r.to).collect();
        let arc_cost: Vec<f64>    = raw.iter().map(|r| r.data.cost).collect();
        let arc_cap:  Vec<f64>    = raw.iter().map(|r| r.data.capacity).collect();

        let mut arc_index: FxHashMap<ExtId, Vec<ArcId>> = FxHashMap::default();
        let mut split_origins: FxHashMap<ArcId, ExtId> = FxHashMap::default();
        let mut split_arcs: Vec<Vec<ArcId>> = vec![Vec::new(); self.splits.len()];
        for (i, r) in raw.iter().enumerate() {
            let id = ArcId(i as u32);
            if let Some(ext) = r.data.ext_id.as_ref().filter(|e| !e.is_empty()) {
                arc_index.entry(ext.clone()).or_default().push(id);
            }
            if let Some(k) = r.split_of {
                split_arcs[k].push(id);
                split_origins.insert(id, self.splits[k].ext_id.clone());
            }
        }
        let arc_ext: Vec<Option<ExtId>> = raw.into_iter().map(|r| r.data.ext_id).collect();

        let splits = self
            .splits
            .into_iter()
            .zip(split_arcs)
            .map(|(p, arcs)| SplittedArc { ext_id: p.ext_id, node: p.node, ratio: p.ratio, arcs })
            .collect();

        let (out_start, out_arcs) = csr_index(n, &arc_from);
        let (in_start, in_arcs) = csr_index(n, &arc_to);

        let first_bad_cost = arc_cost.iter().position(|c| !c.is_finite());
        let first_negative_cost = arc_cost.iter().position(|&c| c < 0.0);
        let first_bad_capacity = arc_cap.iter().position(|&c| c.is_nan() || c < 0.0);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .node_pos
            .iter()
            .enumerate()
            .filter_map(|(i, pos)| {
                pos.map(|p| NodeEntry { point: [p.lat, p.lon], id: NodeId(i as u32) })
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let to_arc = |i: usize| ArcId(i as u32);
        InternalNet {
            node_ext: self.node_ext,
            node_supply: self.node_supply,
            node_pos: self.node_pos,
            node_index: self.node_index,
            arc_from,
            arc_to,
            arc_cost,
            arc_cap,
            arc_ext,
            arc_index,
            out_start,
            out_arcs,
            in_start,
            in_arcs,
            splits,
            swapped: self.swapped,
            split_origins,
            first_bad_cost: first_bad_cost.map(to_arc),
            first_negative_cost: first_negative_cost.map(to_arc),
            first_bad_capacity: first_bad_capacity.map(to_arc),
            spatial_idx,
        }
    }
}

impl Default for InternalNetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Counting sort of arc ids by `key` node: a CSR row pointer of length
/// `n + 1` plus the arc ids, ascending within each row.
fn csr_index(n: usize, key: &[NodeId]) -> (Vec<u32>, Vec<ArcId>) {
    let mut start = vec![0u32; n + 1];
    for k in key {
        start[k.index() + 1] += 1;
    }
    for i in 1..=n {
        start[i] += start[i - 1];
    }
    debug_assert_eq!(start[n] as usize, key.len());

    let mut fill: Vec<u32> = start[..n].to_vec();
    let mut arcs = vec![ArcId::INVALID; key.len()];
    for (i, k) in key.iter().enumerate() {
        let slot = &mut fill[k.index()];
        arcs[*slot as usize] = ArcId(i as u32);
        *slot += 1;
    }
    (start, arcs)
}

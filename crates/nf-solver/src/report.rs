//! Record types shared by the composite solvers.

use std::sync::Arc;
use std::time::Instant;

use nf_algo::SptResult;
use nf_core::{ExtId, GeometryHandling, NfError, NodeId, SolveObserver};
use nf_net::{InternalNet, RouteShape};

// ── Route ─────────────────────────────────────────────────────────────────────

/// One least-cost route in external identifiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Nodes from origin to destination inclusive.
    pub nodes: Vec<ExtId>,
    /// Original arc ids in travel order.  Split halves map back to the arc
    /// they were cut from; synthetic arcs are omitted.
    pub arcs:  Vec<ExtId>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "RouteShape::is_none"))]
    pub shape: RouteShape,
}

impl Route {
    /// Route to `dest` in a finished search, or `None` if it was not reached.
    pub fn from_search(
        net:      &InternalNet,
        spt:      &SptResult,
        dest:     NodeId,
        geometry: GeometryHandling,
    ) -> Option<Self> {
        let path = spt.path_arcs(dest)?;
        let nodes = spt
            .path_nodes(dest)?
            .into_iter()
            .map(|n| net.node_ext_id(n).clone())
            .collect();
        Some(Route {
            nodes,
            arcs: net.original_arc_ids(&path),
            shape: net.route_shape(spt.origin(), dest, &path, geometry),
        })
    }
}

// ── Rejected ──────────────────────────────────────────────────────────────────

/// A batch entry that could not be solved.  The rest of the batch is
/// unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejected {
    /// Identifier as the caller supplied it.
    pub id:    ExtId,
    pub error: NfError,
}

impl Rejected {
    pub(crate) fn new(id: impl Into<ExtId>, error: NfError, observer: &dyn SolveObserver) -> Self {
        observer.on_rejected(&error);
        Rejected { id: id.into(), error }
    }
}

// ── Solve session ─────────────────────────────────────────────────────────────

/// Start/end bookkeeping for one composite solve.
pub(crate) struct Session<'a> {
    solver:   &'static str,
    observer: &'a Arc<dyn SolveObserver>,
    started:  Instant,
}

impl<'a> Session<'a> {
    pub(crate) fn start(solver: &'static str, origins: usize, observer: &'a Arc<dyn SolveObserver>) -> Self {
        observer.on_solve_start(solver, origins);
        Session { solver, observer, started: Instant::now() }
    }

    pub(crate) fn observer(&self) -> &dyn SolveObserver {
        self.observer.as_ref()
    }

    pub(crate) fn finish(self) {
        self.observer.on_solve_end(self.solver, self.started.elapsed());
    }
}

/// Resolve caller identifiers, recording unknown ones as rejected.
pub(crate) fn resolve_all<S: AsRef<str>>(
    net:      &InternalNet,
    ids:      &[S],
    rejected: &mut Vec<Rejected>,
    observer: &dyn SolveObserver,
) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(ids.len());
    for id in ids {
        match net.node(id.as_ref()) {
            Ok(n) => nodes.push(n),
            Err(e) => rejected.push(Rejected::new(id.as_ref(), e, observer)),
        }
    }
    nodes
}

//! Minimum-spanning-tree report.

use std::sync::Arc;

use nf_algo::{PrimMst, SpanningTreeEngine};
use nf_core::{ExtId, NfResult, NoopObserver, SolveObserver, SolverConfig};
use nf_net::InternalNet;

use crate::report::Session;

/// One selected arc.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeArc {
    /// Original arc id; `None` for unnamed arcs.
    pub arc:  Option<ExtId>,
    pub from: ExtId,
    pub to:   ExtId,
    pub cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MstReport {
    /// Ascending internal arc order.
    pub arcs:       Vec<TreeArc>,
    pub optimum:    f64,
    /// Connected components, isolated nodes included.
    pub tree_count: usize,
}

pub struct MinSpanningTreeSolver {
    observer: Arc<dyn SolveObserver>,
}

impl MinSpanningTreeSolver {
    /// The configuration has no spanning-tree knobs; it is validated for
    /// uniformity with the other solvers.
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        config.validate()?;
        Ok(Self { observer: Arc::new(NoopObserver) })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn solve(&self, net: &InternalNet) -> NfResult<MstReport> {
        self.run(net, None)
    }

    /// Spanning tree of the component containing node `root` only.
    pub fn solve_component(&self, net: &InternalNet, root: &str) -> NfResult<MstReport> {
        self.run(net, Some(root))
    }

    fn run(&self, net: &InternalNet, root: Option<&str>) -> NfResult<MstReport> {
        let session = Session::start("minimum_spanning_tree", 0, &self.observer);
        let mut engine = PrimMst::new();
        let forest = match root {
            Some(id) => net.node(id).and_then(|r| engine.solve_component(net, r)),
            None => engine.solve(net),
        };
        let result = forest.map(|forest| MstReport {
            arcs: forest
                .arcs
                .iter()
                .map(|&a| TreeArc {
                    arc:  net.original_arc_ids(&[a]).pop(),
                    from: net.node_ext_id(net.arc_source(a)).clone(),
                    to:   net.node_ext_id(net.arc_target(a)).clone(),
                    cost: net.arc_cost(a),
                })
                .collect(),
            optimum: forest.total_cost,
            tree_count: forest.tree_count,
        });
        if let Err(e) = &result {
            session.observer().on_rejected(e);
        }
        session.finish();
        result
    }
}

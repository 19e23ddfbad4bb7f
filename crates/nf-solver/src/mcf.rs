//! Min-cost-flow report with optional supply balancing.
//!
//! With [`SolverConfig::balance_flow`] set (the default) an unbalanced
//! network is solved on a copy carrying one dummy node, and the dummy's arcs
//! are dropped from the result: surplus supply stays at its source, unmet
//! demand stays unmet.  With balancing off, unequal totals are rejected as
//! `MalformedInput::Imbalance`.

use std::sync::Arc;

use nf_algo::{McfResult, MinCostFlowEngine, NetworkSimplex};
use nf_core::{ExtId, FlowInstanceType, FlowStatus, NfResult, NoopObserver, SolveObserver, SolverConfig};
use nf_net::InternalNet;

use crate::report::Session;

/// An arc carrying positive flow.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRecord {
    pub arc:      Option<ExtId>,
    pub from:     ExtId,
    pub to:       ExtId,
    pub flow:     f64,
    /// Unit cost.
    pub cost:     f64,
    pub capacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McfReport {
    pub status:   FlowStatus,
    pub instance: FlowInstanceType,
    /// `Σ flow · cost` over the caller's arcs.
    pub optimum:  f64,
    pub flows:    Vec<FlowRecord>,
    pub pivots:   u64,
}

pub struct MinCostFlowSolver {
    config:     SolverConfig,
    observer:   Arc<dyn SolveObserver>,
    max_pivots: Option<u64>,
}

impl MinCostFlowSolver {
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        config.validate()?;
        Ok(Self { config, observer: Arc::new(NoopObserver), max_pivots: None })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Give up with `FlowStatus::Error` after `limit` pivots.
    pub fn with_max_pivots(mut self, limit: u64) -> Self {
        self.max_pivots = Some(limit);
        self
    }

    pub fn solve(&self, net: &InternalNet) -> NfResult<McfReport> {
        let session = Session::start("min_cost_flow", 0, &self.observer);
        let result = self.run(net).map(|flow| McfReport {
            status:   flow.status,
            instance: net.instance_type(),
            optimum:  flow.total_cost,
            flows:    flow
                .flow_arcs()
                .map(|(a, f)| FlowRecord {
                    arc:      net.original_arc_ids(&[a]).pop(),
                    from:     net.node_ext_id(net.arc_source(a)).clone(),
                    to:       net.node_ext_id(net.arc_target(a)).clone(),
                    flow:     f,
                    cost:     net.arc_cost(a),
                    capacity: net.arc_capacity(a),
                })
                .collect(),
            pivots:   flow.pivots,
        });
        if let Err(e) = &result {
            session.observer().on_rejected(e);
        }
        session.finish();
        result
    }

    /// Solve `net`, balancing first if configured.  Flows and potentials are
    /// indexed by `net`'s own ids.
    pub(crate) fn run(&self, net: &InternalNet) -> NfResult<McfResult> {
        let mut engine = NetworkSimplex { max_pivots: self.max_pivots };
        let instance = net.instance_type();

        let result = if self.config.balance_flow && instance != FlowInstanceType::Balanced {
            let balanced = net.balanced();
            tracing::debug!(?instance, dummy = ?balanced.dummy, "balanced flow instance");
            let mut r = engine.solve(&balanced.net)?;
            r.flows.truncate(balanced.real_arcs);
            r.potentials.truncate(net.node_count());
            if r.status != FlowStatus::Unbounded {
                r.total_cost = r.flows.iter().zip(net.costs()).map(|(f, c)| f * c).sum();
            }
            r
        } else {
            engine.solve(net)?
        };

        self.observer.on_flow_solved(result.status, result.pivots, result.total_cost);
        Ok(result)
    }
}

//! Transportation (distribution) problems.
//!
//! Origins with supplies ship to destinations with demands at a per-unit
//! cost per pair.  The instance is reduced to min-cost flow on a small
//! bipartite network:
//!
//! ```text
//!            cap = supply(o)        cost = c(o,d), cap = ∞        cap = demand(d)
//!   source ─────────────────→ o ──────────────────────────→ d ─────────────────→ sink
//! ```
//!
//! `source` supplies `min(Σ supply, Σ demand)` and `sink` absorbs the same,
//! so unequal totals need no dummy node and delivered quantity never exceeds
//! the smaller total.  Only reachable pairs get an arc.  Pair costs come
//! either from shortest paths on a network ([`solve_on_network`]) or from a
//! caller table ([`solve_with_costs`]).  The synthetic nodes and arcs never
//! appear in the report.
//!
//! [`solve_on_network`]: TransportationSolver::solve_on_network
//! [`solve_with_costs`]: TransportationSolver::solve_with_costs

use std::sync::Arc;

use nf_core::{
    ExtId, FlowStatus, MalformedInput, NfError, NfResult, NoopObserver, SolveObserver, SolverConfig,
};
use nf_net::{ArcData, InternalNet, InternalNetBuilder};
use rustc_hash::FxHashMap;

use crate::mcf::MinCostFlowSolver;
use crate::odmatrix::OdMatrixSolver;
use crate::report::{Rejected, Session};

// ── Records ───────────────────────────────────────────────────────────────────

/// One row of a caller-supplied cost table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostEntry {
    pub origin:      ExtId,
    pub destination: ExtId,
    /// Cost per unit shipped.
    pub cost:        f64,
}

impl CostEntry {
    pub fn new(origin: impl Into<ExtId>, destination: impl Into<ExtId>, cost: f64) -> Self {
        Self { origin: origin.into(), destination: destination.into(), cost }
    }
}

/// Quantity shipped from one origin to one destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    pub origin:      ExtId,
    pub destination: ExtId,
    pub flow:        f64,
    pub unit_cost:   f64,
    /// `flow · unit_cost`.
    pub cost:        f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationReport {
    pub status:       FlowStatus,
    pub optimum:      f64,
    /// Σ flow over all distributions.
    pub delivered:    f64,
    pub total_supply: f64,
    pub total_demand: f64,
    /// Pairs with positive flow, by origin then destination order.
    pub distribution: Vec<Distribution>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rejected:     Vec<Rejected>,
}

// ── TransportationSolver ──────────────────────────────────────────────────────

pub struct TransportationSolver {
    observer: Arc<dyn SolveObserver>,
    od:       OdMatrixSolver,
    flow:     MinCostFlowSolver,
}

/// Validated, de-duplicated side of the problem.
struct Side {
    ids:        Vec<ExtId>,
    quantities: Vec<f64>,
}

impl Side {
    fn total(&self) -> f64 {
        self.quantities.iter().sum()
    }
}

impl TransportationSolver {
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        let od = OdMatrixSolver::new(config.clone())?;
        let flow = MinCostFlowSolver::new(config)?;
        Ok(Self { observer: Arc::new(NoopObserver), od, flow })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.od = self.od.with_observer(observer.clone());
        self.flow = self.flow.with_observer(observer.clone());
        self.observer = observer;
        self
    }

    /// Pair costs are least path costs on `net`.  Unknown node ids and
    /// invalid quantities are rejected; unreachable pairs get no arc.
    pub fn solve_on_network<S: AsRef<str>>(
        &self,
        net:          &InternalNet,
        origins:      &[(S, f64)],
        destinations: &[(S, f64)],
    ) -> NfResult<TransportationReport> {
        let session = Session::start("transportation", origins.len(), &self.observer);
        if let Err(e) = net.check_nonnegative_costs() {
            session.observer().on_rejected(&e);
            session.finish();
            return Err(e);
        }

        let mut rejected = Vec::new();
        let known = |id: &str| net.node(id).map(|_| ());
        let sources = collect_side(origins, known, &mut rejected, session.observer());
        let sinks = collect_side(destinations, known, &mut rejected, session.observer());

        let to_nodes = |side: &Side| -> Vec<_> {
            side.ids.iter().filter_map(|id| net.node(id.as_str()).ok()).collect()
        };
        let (o_nodes, d_nodes) = (to_nodes(&sources), to_nodes(&sinks));
        let costs = self.od.pair_costs(net, &o_nodes, &d_nodes);

        let mut pairs = Vec::new();
        for (i, &o) in o_nodes.iter().enumerate() {
            for (j, &d) in d_nodes.iter().enumerate() {
                if let Some(&c) = costs.get(&(o, d)) {
                    pairs.push((i, j, c));
                }
            }
        }

        let result = self.distribute(sources, sinks, pairs, rejected);
        if let Err(e) = &result {
            session.observer().on_rejected(e);
        }
        session.finish();
        result
    }

    /// Pair costs come from `costs`.  Entries naming an origin or
    /// destination not in the supply lists are rejected; repeated pairs keep
    /// the cheapest cost.
    pub fn solve_with_costs<S: AsRef<str>>(
        &self,
        costs:        &[CostEntry],
        origins:      &[(S, f64)],
        destinations: &[(S, f64)],
    ) -> NfResult<TransportationReport> {
        let session = Session::start("transportation", origins.len(), &self.observer);

        let mut rejected = Vec::new();
        let any = |_: &str| Ok(());
        let sources = collect_side(origins, any, &mut rejected, session.observer());
        let sinks = collect_side(destinations, any, &mut rejected, session.observer());

        let index = |side: &Side| -> FxHashMap<ExtId, usize> {
            side.ids.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect()
        };
        let (o_index, d_index) = (index(&sources), index(&sinks));

        let mut cheapest: FxHashMap<(usize, usize), f64> = FxHashMap::default();
        for entry in costs {
            if !entry.cost.is_finite() {
                let e = MalformedInput::InvalidPairCost {
                    origin:      entry.origin.to_string(),
                    destination: entry.destination.to_string(),
                    cost:        entry.cost,
                };
                rejected.push(Rejected::new(&entry.origin, e.into(), session.observer()));
                continue;
            }
            let (Some(&i), Some(&j)) = (o_index.get(&entry.origin), d_index.get(&entry.destination)) else {
                let missing = if o_index.contains_key(&entry.origin) { &entry.destination } else { &entry.origin };
                rejected.push(Rejected::new(missing, NfError::unknown_node(missing), session.observer()));
                continue;
            };
            cheapest
                .entry((i, j))
                .and_modify(|c| *c = c.min(entry.cost))
                .or_insert(entry.cost);
        }
        let mut pairs: Vec<(usize, usize, f64)> = cheapest.into_iter().map(|((i, j), c)| (i, j, c)).collect();
        pairs.sort_unstable_by_key(|&(i, j, _)| (i, j));

        let result = self.distribute(sources, sinks, pairs, rejected);
        if let Err(e) = &result {
            session.observer().on_rejected(e);
        }
        session.finish();
        result
    }

    /// Build the reduced network, solve it and project flows back onto
    /// pairs.  `pairs` are `(origin index, destination index, unit cost)`.
    fn distribute(
        &self,
        sources:  Side,
        sinks:    Side,
        pairs:    Vec<(usize, usize, f64)>,
        rejected: Vec<Rejected>,
    ) -> NfResult<TransportationReport> {
        let (total_supply, total_demand) = (sources.total(), sinks.total());
        let shipped = total_supply.min(total_demand);
        let (no, nd) = (sources.ids.len(), sinks.ids.len());

        let mut b = InternalNetBuilder::with_capacity(no + nd + 2, no + nd + pairs.len());
        let source = b.add_node("s", shipped);
        let sink = b.add_node("t", -shipped);
        let o_nodes: Vec<_> = (0..no).map(|i| b.add_node(format!("o{i}"), 0.0)).collect();
        let d_nodes: Vec<_> = (0..nd).map(|j| b.add_node(format!("d{j}"), 0.0)).collect();

        for (&o, &q) in o_nodes.iter().zip(&sources.quantities) {
            b.add_arc(source, o, ArcData::new(0.0).with_capacity(q));
        }
        let first_pair = no;
        for &(i, j, c) in &pairs {
            b.add_arc(o_nodes[i], d_nodes[j], ArcData::new(c));
        }
        for (&d, &q) in d_nodes.iter().zip(&sinks.quantities) {
            b.add_arc(d, sink, ArcData::new(0.0).with_capacity(q));
        }
        let reduced = b.build()?;

        let flow = self.flow.run(&reduced)?;
        let mut report = TransportationReport {
            status: flow.status,
            optimum: 0.0,
            delivered: 0.0,
            total_supply,
            total_demand,
            distribution: Vec::new(),
            rejected,
        };
        for (k, &(i, j, c)) in pairs.iter().enumerate() {
            let f = flow.flows[first_pair + k];
            if f > 0.0 {
                report.optimum += f * c;
                report.delivered += f;
                report.distribution.push(Distribution {
                    origin: sources.ids[i].clone(),
                    destination: sinks.ids[j].clone(),
                    flow: f,
                    unit_cost: c,
                    cost: f * c,
                });
            }
        }
        tracing::debug!(
            status = %report.status,
            delivered = report.delivered,
            pairs = pairs.len(),
            "transportation solved"
        );
        Ok(report)
    }
}

/// Validate and merge one side's `(id, quantity)` list.  Repeated ids add up
/// and keep their first position.
fn collect_side<S: AsRef<str>>(
    entries:  &[(S, f64)],
    known:    impl Fn(&str) -> NfResult<()>,
    rejected: &mut Vec<Rejected>,
    observer: &dyn SolveObserver,
) -> Side {
    let mut side = Side { ids: Vec::new(), quantities: Vec::new() };
    let mut pos: FxHashMap<ExtId, usize> = FxHashMap::default();
    for (id, q) in entries {
        let id = id.as_ref();
        if let Err(e) = known(id) {
            rejected.push(Rejected::new(id, e, observer));
            continue;
        }
        if !q.is_finite() || *q < 0.0 {
            let e = MalformedInput::InvalidQuantity { id: id.to_owned(), quantity: *q };
            rejected.push(Rejected::new(id, e.into(), observer));
            continue;
        }
        match pos.get(id) {
            Some(&i) => side.quantities[i] += q,
            None => {
                pos.insert(ExtId::new(id), side.ids.len());
                side.ids.push(ExtId::new(id));
                side.quantities.push(*q);
            }
        }
    }
    side
}

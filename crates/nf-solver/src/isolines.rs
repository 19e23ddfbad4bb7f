//! Reachability isolines.
//!
//! Each origin carries a list of cost cutoffs (bands).  One search per
//! origin, bounded by its largest cutoff, labels the reachable subgraph:
//!
//! * every node within the largest cutoff, with its reach cost and the index
//!   of the smallest band containing it;
//! * every arc leaving a reached node with part of its length inside the
//!   largest cutoff, with the cost at both ends and that fraction.  Arcs
//!   crossing the outer boundary have `0 < fraction < 1`.
//!
//! Turning this into polygons is left to the caller's geometry layer.

use std::sync::Arc;

use nf_algo::{ShortestPathEngine, SptQuery, SptResult};
use nf_core::{ExtId, MalformedInput, NfResult, NodeId, NoopObserver, SolveObserver, SolverConfig};
use nf_net::InternalNet;

use crate::pool::WorkerPool;
use crate::report::{Rejected, Session};

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachedNode {
    pub node: ExtId,
    pub cost: f64,
    /// Index into [`OriginIsolines::cutoffs`] of the smallest band with
    /// `cost <= cutoff`.
    pub band: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachedArc {
    /// Original arc id; `None` for unnamed arcs.
    pub arc:        Option<ExtId>,
    pub from:       ExtId,
    pub to:         ExtId,
    /// Reach cost at the arc's start.
    pub start_cost: f64,
    /// `start_cost + arc cost`; may exceed the largest cutoff.
    pub end_cost:   f64,
    /// Share of the arc within the largest cutoff, in `(0, 1]`.
    pub fraction:   f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginIsolines {
    pub origin:  ExtId,
    /// Ascending, duplicates removed.
    pub cutoffs: Vec<f64>,
    /// Settle order (ascending cost); the origin comes first.
    pub nodes:   Vec<ReachedNode>,
    pub arcs:    Vec<ReachedArc>,
}

impl OriginIsolines {
    /// Nodes inside band `band`, i.e. within `cutoffs[band]`.
    pub fn nodes_within(&self, band: usize) -> impl Iterator<Item = &ReachedNode> + '_ {
        self.nodes.iter().filter(move |n| n.band <= band)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsolinesReport {
    /// Caller order; rejected origins are skipped.
    pub origins:  Vec<OriginIsolines>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rejected: Vec<Rejected>,
}

// ── IsolinesSolver ────────────────────────────────────────────────────────────

pub struct IsolinesSolver {
    config:   SolverConfig,
    observer: Arc<dyn SolveObserver>,
    pool:     WorkerPool,
}

impl IsolinesSolver {
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.num_threads)?;
        Ok(Self { config, observer: Arc::new(NoopObserver), pool })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Isolines for every `(origin, cutoffs)` entry.  Unknown origins and
    /// empty, negative or NaN cutoff lists are rejected per entry.
    pub fn solve<S: AsRef<str>>(
        &self,
        net:     &InternalNet,
        origins: &[(S, Vec<f64>)],
    ) -> NfResult<IsolinesReport> {
        let session = Session::start("isolines", origins.len(), &self.observer);
        if let Err(e) = net.check_nonnegative_costs() {
            session.observer().on_rejected(&e);
            session.finish();
            return Err(e);
        }

        let mut report = IsolinesReport::default();
        let mut jobs: Vec<(NodeId, Vec<f64>)> = Vec::with_capacity(origins.len());
        for (id, cutoffs) in origins {
            let id = id.as_ref();
            let checked = net.node(id).and_then(|n| normalize_cutoffs(cutoffs).map(|c| (n, c)));
            match checked {
                Ok(job) => jobs.push(job),
                Err(e) => report.rejected.push(Rejected::new(id, e, session.observer())),
            }
        }

        let arity = self.config.heap_arity(net.arc_count(), net.node_count());
        let observer = self.observer.as_ref();
        let results = self.pool.map_with_engine(&jobs, arity, |spt, (o, cutoffs)| -> NfResult<OriginIsolines> {
            let max = cutoffs.last().copied().unwrap_or(0.0);
            let result = spt.solve(net, &SptQuery::to_all(*o).with_cutoff(max))?;
            observer.on_origin_done(net.node_ext_id(*o), result.reached_count());
            Ok(extract(net, &result, cutoffs.clone()))
        });

        for (r, (o, _)) in results.into_iter().zip(&jobs) {
            match r {
                Ok(iso) => report.origins.push(iso),
                Err(e) => report.rejected.push(Rejected::new(net.node_ext_id(*o).clone(), e, observer)),
            }
        }
        session.finish();
        Ok(report)
    }
}

/// Sort and de-duplicate a cutoff list, rejecting empty or invalid ones.
fn normalize_cutoffs(cutoffs: &[f64]) -> NfResult<Vec<f64>> {
    if cutoffs.is_empty() {
        return Err(MalformedInput::InvalidCutoff(f64::NAN).into());
    }
    if let Some(&bad) = cutoffs.iter().find(|c| c.is_nan() || **c < 0.0) {
        return Err(MalformedInput::InvalidCutoff(bad).into());
    }
    let mut sorted = cutoffs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    Ok(sorted)
}

/// Reachable nodes and arcs of one bounded search.
fn extract(net: &InternalNet, spt: &SptResult, cutoffs: Vec<f64>) -> OriginIsolines {
    let max = cutoffs.last().copied().unwrap_or(0.0);
    let band_of = |cost: f64| cutoffs.partition_point(|&c| c < cost);

    let nodes = spt
        .settled()
        .iter()
        .map(|&n| {
            let cost = spt.distance(n).unwrap_or(0.0);
            ReachedNode { node: net.node_ext_id(n).clone(), cost, band: band_of(cost) }
        })
        .collect();

    let mut arcs = Vec::new();
    for &u in spt.settled() {
        let start_cost = spt.distance(u).unwrap_or(0.0);
        for a in net.out_arcs(u) {
            let c = net.arc_cost(a);
            if start_cost >= max && c > 0.0 {
                continue;
            }
            let end_cost = start_cost + c;
            let fraction = if end_cost <= max || c <= 0.0 {
                1.0
            } else {
                ((max - start_cost) / c).clamp(0.0, 1.0)
            };
            arcs.push(ReachedArc {
                arc: net.original_arc_ids(&[a]).pop(),
                from: net.node_ext_id(u).clone(),
                to: net.node_ext_id(net.arc_target(a)).clone(),
                start_cost,
                end_cost,
                fraction,
            });
        }
    }

    OriginIsolines { origin: net.node_ext_id(spt.origin()).clone(), cutoffs, nodes, arcs }
}

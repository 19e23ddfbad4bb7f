//! Shortest-path-tree report: one origin to one, many or all destinations.

use std::sync::Arc;

use nf_algo::{DijkstraSpt, ShortestPathEngine, SptQuery};
use nf_core::{ExtId, NfResult, NoopObserver, SolveObserver, SolverConfig};
use nf_net::InternalNet;

use crate::report::{Route, Session};

/// A reached destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRecord {
    pub origin:      ExtId,
    pub destination: ExtId,
    pub cost:        f64,
    pub route:       Route,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SptReport {
    /// Reached destinations, in request order.  All-node searches list
    /// every settled node except the origin, in settle order.
    pub routes:     Vec<RouteRecord>,
    /// Requested destinations without a path.
    pub unreached:  Vec<ExtId>,
    /// Destinations left temporary when `StopRule::FirstReached` ended the
    /// search.  They may have a path.
    pub unsearched: Vec<ExtId>,
    /// Sum of route costs.
    pub optimum:    f64,
}

pub struct ShortestPathTreeSolver {
    config:   SolverConfig,
    observer: Arc<dyn SolveObserver>,
    cutoff:   Option<f64>,
}

impl ShortestPathTreeSolver {
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        config.validate()?;
        Ok(Self { config, observer: Arc::new(NoopObserver), cutoff: None })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Drop destinations farther than `cutoff`.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Routes from `origin` to `destinations`; an empty slice means every
    /// reachable node.
    ///
    /// Unknown identifiers fail the whole call: a single-origin solve has no
    /// sibling entries to continue with.
    pub fn solve<S: AsRef<str>>(
        &self,
        net:          &InternalNet,
        origin:       &str,
        destinations: &[S],
    ) -> NfResult<SptReport> {
        let session = Session::start("shortest_path_tree", 1, &self.observer);
        let result = self.solve_inner(net, origin, destinations);
        if let Err(e) = &result {
            session.observer().on_rejected(e);
        }
        session.finish();
        result
    }

    fn solve_inner<S: AsRef<str>>(
        &self,
        net:          &InternalNet,
        origin:       &str,
        destinations: &[S],
    ) -> NfResult<SptReport> {
        let o = net.node(origin)?;
        let dests = net.resolve_nodes(destinations)?;

        let mut query = SptQuery::to_many(o, dests.clone()).with_stop_rule(self.config.stop_rule);
        query.cutoff = self.cutoff;
        let arity = self.config.heap_arity(net.arc_count(), net.node_count());
        let spt = DijkstraSpt::with_arity(Some(arity)).solve(net, &query)?;
        self.observer.on_origin_done(net.node_ext_id(o), spt.reached_count());

        let targets: Vec<_> = if dests.is_empty() {
            spt.settled().iter().copied().filter(|&n| n != o).collect()
        } else {
            dests
        };

        let origin_ext = net.node_ext_id(o).clone();
        let mut report = SptReport::default();
        for d in targets {
            match (spt.distance(d), Route::from_search(net, &spt, d, self.config.geometry)) {
                (Some(cost), Some(route)) => {
                    report.optimum += cost;
                    report.routes.push(RouteRecord {
                        origin: origin_ext.clone(),
                        destination: net.node_ext_id(d).clone(),
                        cost,
                        route,
                    });
                }
                _ if spt.stopped_early() => report.unsearched.push(net.node_ext_id(d).clone()),
                _ => report.unreached.push(net.node_ext_id(d).clone()),
            }
        }
        Ok(report)
    }
}

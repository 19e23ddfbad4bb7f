//! Origin-destination cost matrix.
//!
//! One shortest-path search per origin against the shared destination set,
//! fanned out over the [`WorkerPool`].  Rows follow the caller's origin
//! order and columns the caller's destination order; unknown identifiers are
//! dropped from the axes and listed in [`OdMatrix::rejected`].

use std::sync::Arc;

use nf_algo::{ShortestPathEngine, SptQuery};
use nf_core::{ExtId, NfResult, NodeId, NoopObserver, SolveObserver, SolverConfig};
use nf_net::InternalNet;
use rustc_hash::FxHashMap;

use crate::pool::WorkerPool;
use crate::report::{Rejected, Route, Session, resolve_all};

// ── PathCost ──────────────────────────────────────────────────────────────────

/// Least cost of one origin-destination pair.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCost {
    Reached(f64),
    NoPath,
    /// `StopRule::FirstReached` ended the origin's search before this
    /// destination was settled.  A path may exist.
    NotSearched,
}

impl PathCost {
    #[inline]
    pub fn cost(self) -> Option<f64> {
        match self {
            PathCost::Reached(c) => Some(c),
            PathCost::NoPath | PathCost::NotSearched => None,
        }
    }

    #[inline]
    pub fn is_reached(self) -> bool {
        matches!(self, PathCost::Reached(_))
    }
}

// ── OdMatrix ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OdMatrix {
    pub origins:      Vec<ExtId>,
    pub destinations: Vec<ExtId>,
    /// Row-major, `origins.len() × destinations.len()`.
    costs:            Vec<PathCost>,
    /// Same layout as `costs`; empty unless routes were kept.
    routes:           Vec<Option<Route>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rejected:     Vec<Rejected>,
}

impl OdMatrix {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> PathCost {
        self.costs[row * self.destinations.len() + col]
    }

    /// Cost by external ids; `None` if either id is not on an axis.  With
    /// repeated ids the first occurrence wins.
    pub fn cost(&self, origin: &str, destination: &str) -> Option<PathCost> {
        let row = self.origins.iter().position(|o| o.as_str() == origin)?;
        let col = self.destinations.iter().position(|d| d.as_str() == destination)?;
        Some(self.get(row, col))
    }

    pub fn row(&self, row: usize) -> &[PathCost] {
        let w = self.destinations.len();
        &self.costs[row * w..(row + 1) * w]
    }

    /// Kept route of a reached cell.
    pub fn route(&self, row: usize, col: usize) -> Option<&Route> {
        self.routes
            .get(row * self.destinations.len() + col)
            .and_then(Option::as_ref)
    }

    /// Every cell as `(origin, destination, cost)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (&ExtId, &ExtId, PathCost)> + '_ {
        let w = self.destinations.len();
        self.costs.iter().enumerate().map(move |(i, &c)| {
            (&self.origins[i / w], &self.destinations[i % w], c)
        })
    }

    pub fn reached_count(&self) -> usize {
        self.costs.iter().filter(|c| c.is_reached()).count()
    }
}

// ── OdMatrixSolver ────────────────────────────────────────────────────────────

/// Costs and optional routes of one origin.
type Row = (Vec<PathCost>, Vec<Option<Route>>);

pub struct OdMatrixSolver {
    config:   SolverConfig,
    observer: Arc<dyn SolveObserver>,
    pool:     WorkerPool,
}

impl OdMatrixSolver {
    pub fn new(config: SolverConfig) -> NfResult<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.num_threads)?;
        Ok(Self { config, observer: Arc::new(NoopObserver), pool })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Costs from every origin to every destination.  An empty destination
    /// list means every node, in node order.
    ///
    /// Fails only when the network itself cannot be searched (negative or
    /// non-finite costs).
    pub fn solve<S: AsRef<str>>(
        &self,
        net:          &InternalNet,
        origins:      &[S],
        destinations: &[S],
    ) -> NfResult<OdMatrix> {
        let session = Session::start("od_matrix", origins.len(), &self.observer);
        if let Err(e) = net.check_nonnegative_costs() {
            session.observer().on_rejected(&e);
            session.finish();
            return Err(e);
        }

        let mut rejected = Vec::new();
        let origin_nodes = resolve_all(net, origins, &mut rejected, session.observer());
        let (dest_nodes, exhaust) = if destinations.is_empty() {
            (net.nodes().collect(), true)
        } else {
            (resolve_all(net, destinations, &mut rejected, session.observer()), false)
        };

        let rows = self.search_rows(net, &origin_nodes, &dest_nodes, exhaust, &mut rejected);

        let width = dest_nodes.len();
        let mut matrix = OdMatrix {
            origins: Vec::with_capacity(origin_nodes.len()),
            destinations: dest_nodes.iter().map(|&d| net.node_ext_id(d).clone()).collect(),
            costs: Vec::with_capacity(origin_nodes.len() * width),
            routes: Vec::new(),
            rejected,
        };
        for (o, row) in origin_nodes.iter().zip(rows) {
            let Some((costs, routes)) = row else { continue };
            matrix.origins.push(net.node_ext_id(*o).clone());
            matrix.costs.extend(costs);
            if self.config.keep_routes {
                matrix.routes.extend(routes);
            }
        }

        tracing::debug!(
            origins = matrix.origins.len(),
            destinations = width,
            reached = matrix.reached_count(),
            rejected = matrix.rejected.len(),
            "od matrix assembled"
        );
        session.finish();
        Ok(matrix)
    }

    /// One row per origin, in origin order; `None` for origins whose search
    /// failed (recorded in `rejected`).
    fn search_rows(
        &self,
        net:      &InternalNet,
        origins:  &[NodeId],
        dests:    &[NodeId],
        exhaust:  bool,
        rejected: &mut Vec<Rejected>,
    ) -> Vec<Option<Row>> {
        let arity = self.config.heap_arity(net.arc_count(), net.node_count());
        let keep_routes = self.config.keep_routes;
        let geometry = self.config.geometry;
        let stop_rule = self.config.stop_rule;
        let observer = self.observer.as_ref();

        let results = self.pool.map_with_engine(origins, arity, |spt, &o| -> NfResult<Row> {
            let query = if exhaust {
                SptQuery::to_all(o)
            } else {
                SptQuery::to_many(o, dests.to_vec()).with_stop_rule(stop_rule)
            };
            let result = spt.solve(net, &query)?;
            observer.on_origin_done(net.node_ext_id(o), result.reached_count());

            let costs: Vec<PathCost> = dests
                .iter()
                .map(|&d| match result.distance(d) {
                    Some(c) => PathCost::Reached(c),
                    None if result.stopped_early() => PathCost::NotSearched,
                    None => PathCost::NoPath,
                })
                .collect();
            let routes = if keep_routes {
                dests.iter().map(|&d| Route::from_search(net, &result, d, geometry)).collect()
            } else {
                Vec::new()
            };
            Ok((costs, routes))
        });

        results
            .into_iter()
            .zip(origins)
            .map(|(r, &o)| match r {
                Ok(row) => Some(row),
                Err(e) => {
                    rejected.push(Rejected::new(net.node_ext_id(o).clone(), e, observer));
                    None
                }
            })
            .collect()
    }

    /// Cost lookup keyed by node pair, reachable pairs only.
    pub(crate) fn pair_costs(
        &self,
        net:     &InternalNet,
        origins: &[NodeId],
        dests:   &[NodeId],
    ) -> FxHashMap<(NodeId, NodeId), f64> {
        let arity = self.config.heap_arity(net.arc_count(), net.node_count());
        let observer = self.observer.as_ref();
        let rows = self.pool.map_with_engine(origins, arity, |spt, &o| {
            spt.solve(net, &SptQuery::to_many(o, dests.to_vec())).map(|r| {
                observer.on_origin_done(net.node_ext_id(o), r.reached_count());
                dests.iter().map(|&d| r.distance(d)).collect::<Vec<_>>()
            })
        });

        let mut out = FxHashMap::default();
        for (&o, row) in origins.iter().zip(rows) {
            let Ok(row) = row else { continue };
            for (&d, cost) in dests.iter().zip(row) {
                if let Some(c) = cost {
                    out.insert((o, d), c);
                }
            }
        }
        out
    }
}

//! One-call wrappers over the default configuration.
//!
//! Each function builds the matching solver from `SolverConfig::default()`
//! and runs it once.  Use the solver types directly to tune heap arity,
//! threads, geometry, or to attach an observer.

use nf_core::{NfResult, SolverConfig};
use nf_net::InternalNet;

use crate::{
    CostEntry, IsolinesReport, IsolinesSolver, McfReport, MinCostFlowSolver, MinSpanningTreeSolver,
    MstReport, OdMatrix, OdMatrixSolver, ShortestPathTreeSolver, SptReport, TransportationReport,
    TransportationSolver,
};

/// Routes from `origin` to `destinations` (empty = all nodes).
pub fn shortest_path_tree<S: AsRef<str>>(
    net:          &InternalNet,
    origin:       &str,
    destinations: &[S],
) -> NfResult<SptReport> {
    ShortestPathTreeSolver::new(SolverConfig::default())?.solve(net, origin, destinations)
}

pub fn minimum_spanning_tree(net: &InternalNet) -> NfResult<MstReport> {
    MinSpanningTreeSolver::new(SolverConfig::default())?.solve(net)
}

/// Min-cost flow, balancing unequal supply and demand.
pub fn min_cost_flow(net: &InternalNet) -> NfResult<McfReport> {
    MinCostFlowSolver::new(SolverConfig::default())?.solve(net)
}

pub fn od_matrix<S: AsRef<str>>(
    net:          &InternalNet,
    origins:      &[S],
    destinations: &[S],
) -> NfResult<OdMatrix> {
    OdMatrixSolver::new(SolverConfig::default())?.solve(net, origins, destinations)
}

pub fn transportation<S: AsRef<str>>(
    net:          &InternalNet,
    origins:      &[(S, f64)],
    destinations: &[(S, f64)],
) -> NfResult<TransportationReport> {
    TransportationSolver::new(SolverConfig::default())?.solve_on_network(net, origins, destinations)
}

pub fn transportation_with_costs<S: AsRef<str>>(
    costs:        &[CostEntry],
    origins:      &[(S, f64)],
    destinations: &[(S, f64)],
) -> NfResult<TransportationReport> {
    TransportationSolver::new(SolverConfig::default())?.solve_with_costs(costs, origins, destinations)
}

/// Isolines with a single cutoff per origin.
pub fn isolines<S: AsRef<str>>(
    net:     &InternalNet,
    origins: &[S],
    cutoff:  f64,
) -> NfResult<IsolinesReport> {
    let entries: Vec<(&str, Vec<f64>)> = origins.iter().map(|o| (o.as_ref(), vec![cutoff])).collect();
    IsolinesSolver::new(SolverConfig::default())?.solve(net, &entries)
}

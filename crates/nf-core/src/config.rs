//! Solver configuration.
//!
//! Loaded by the application (TOML, JSON, command line) and handed to the
//! composite solvers at construction time.  Nothing here changes solver
//! *results* except [`StopRule`]; the rest are tuning and presentation knobs.

use crate::{NfError, NfResult};

// ── GeometryHandling ──────────────────────────────────────────────────────────

/// What route geometry the solvers hand back alongside identifiers and costs.
///
/// Has no effect on solver math.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryHandling {
    /// Identifiers and costs only.
    #[default]
    NoGeometry,
    /// A straight segment from origin to destination position.
    StraightLines,
    /// The node positions of the actual route, in travel order.
    ActualRoute,
    /// The actual route as a Google encoded polyline (precision 5).
    EncodedPolyline,
}

// ── StopRule ──────────────────────────────────────────────────────────────────

/// When a shortest-path search with an explicit destination set may stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopRule {
    /// Label every destination permanently (or exhaust the frontier).
    #[default]
    AllDestinations,
    /// Stop as soon as the first destination becomes permanent.
    FirstReached,
}

// ── SolverConfig ──────────────────────────────────────────────────────────────

/// Options every composite solver honors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Branching factor of the SPT priority heap.  `None` picks
    /// `arcs / nodes` (at least 2) for each network.
    pub heap_cardinality: Option<usize>,

    /// Worker thread count for batch solves.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Route geometry returned with SPT and OD results.
    pub geometry: GeometryHandling,

    /// Termination rule for searches with explicit destinations.
    pub stop_rule: StopRule,

    /// Balance unequal supply and demand with a dummy node before a
    /// min-cost-flow solve.  When `false`, imbalance is rejected.
    pub balance_flow: bool,

    /// Keep node routes in OD-matrix results.  Off by default: a route per
    /// cell is O(origins × destinations × path length).
    pub keep_routes: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heap_cardinality: None,
            num_threads:      None,
            geometry:         GeometryHandling::NoGeometry,
            stop_rule:        StopRule::AllDestinations,
            balance_flow:     true,
            keep_routes:      false,
        }
    }
}

impl SolverConfig {
    /// Reject settings no solver can honor.
    pub fn validate(&self) -> NfResult<()> {
        if let Some(d) = self.heap_cardinality {
            if d < 2 {
                return Err(NfError::Config(format!(
                    "heap_cardinality must be at least 2, got {d}"
                )));
            }
        }
        if self.num_threads == Some(0) {
            return Err(NfError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Heap arity to use on a network of the given size.
    pub fn heap_arity(&self, arc_count: usize, node_count: usize) -> usize {
        match self.heap_cardinality {
            Some(d) => d.max(2),
            None => auto_heap_arity(arc_count, node_count),
        }
    }
}

/// Average out-degree, clamped to `2..=16`.
#[inline]
pub fn auto_heap_arity(arc_count: usize, node_count: usize) -> usize {
    if node_count == 0 {
        return 2;
    }
    (arc_count / node_count).clamp(2, 16)
}

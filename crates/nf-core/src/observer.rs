//! Solve observer trait for diagnostics and timing.
//!
//! The engine never logs through global state.  Composite solvers measure
//! their own wall time and report it, together with per-origin progress and
//! rejected entries, to an injected [`SolveObserver`].

use std::time::Duration;

use crate::{ExtId, FlowStatus, NfError};

/// Callbacks invoked by the composite solvers.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Methods take `&self` because batch
/// solves call them from worker threads; use interior mutability (atomics, a
/// `Mutex`) to accumulate state.
///
/// # Example: origin counter
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use nf_core::{ExtId, SolveObserver};
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl SolveObserver for Counter {
///     fn on_origin_done(&self, _origin: &ExtId, _reached: usize) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait SolveObserver: Send + Sync {
    /// Called once before a solver starts working on `origins` origins
    /// (1 for single-source problems, 0 for MST and plain MCF).
    fn on_solve_start(&self, _solver: &'static str, _origins: usize) {}

    /// Called after each origin's search completes.  `reached` counts the
    /// destinations (or nodes, for isolines) the search labelled.
    fn on_origin_done(&self, _origin: &ExtId, _reached: usize) {}

    /// Called for every batch entry rejected without aborting the batch.
    fn on_rejected(&self, _error: &NfError) {}

    /// Called after a network-simplex run.
    fn on_flow_solved(&self, _status: FlowStatus, _pivots: u64, _cost: f64) {}

    /// Called once when the solver has assembled its result.
    fn on_solve_end(&self, _solver: &'static str, _elapsed: Duration) {}
}

/// A [`SolveObserver`] that does nothing.
pub struct NoopObserver;

impl SolveObserver for NoopObserver {}

/// A [`SolveObserver`] that forwards every callback as a `tracing` event.
///
/// Install a subscriber (e.g. `tracing_subscriber::fmt`) in the application
/// to see them.
pub struct TracingObserver;

impl SolveObserver for TracingObserver {
    fn on_solve_start(&self, solver: &'static str, origins: usize) {
        tracing::info!(solver, origins, "solve start");
    }

    fn on_origin_done(&self, origin: &ExtId, reached: usize) {
        tracing::debug!(origin = %origin, reached, "origin done");
    }

    fn on_rejected(&self, error: &NfError) {
        tracing::warn!(%error, "entry rejected");
    }

    fn on_flow_solved(&self, status: FlowStatus, pivots: u64, cost: f64) {
        tracing::info!(%status, pivots, cost, "network simplex finished");
    }

    fn on_solve_end(&self, solver: &'static str, elapsed: Duration) {
        tracing::info!(solver, elapsed_ms = elapsed.as_secs_f64() * 1e3, "solve end");
    }
}

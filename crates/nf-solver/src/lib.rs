//! `nf-solver`: composite network-analysis solvers.
//!
//! Each solver is built from a [`SolverConfig`](nf_core::SolverConfig),
//! optionally given a [`SolveObserver`](nf_core::SolveObserver), and then
//! borrows an [`InternalNet`](nf_net::InternalNet) read-only per call.
//! Results are plain records keyed by external identifiers.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                   |
//! |--------------------|------------------------------------------------------------|
//! | [`sptree`]         | `ShortestPathTreeSolver`, `SptReport`, `RouteRecord`       |
//! | [`mst`]            | `MinSpanningTreeSolver`, `MstReport`                       |
//! | [`mcf`]            | `MinCostFlowSolver`, `McfReport` (dummy-node balancing)    |
//! | [`odmatrix`]       | `OdMatrixSolver`, `OdMatrix`, `PathCost`                   |
//! | [`transportation`] | `TransportationSolver`, `TransportationReport`             |
//! | [`isolines`]       | `IsolinesSolver`, `IsolinesReport`                         |
//! | [`report`]         | `Route`, `Rejected`                                        |
//! | [`pool`]           | `WorkerPool` (per-worker search engines)                   |
//! | [`simple`]         | one-call wrappers over the default configuration           |
//!
//! # Feature flags
//!
//! | Flag       | Default | Effect                                                |
//! |------------|---------|-------------------------------------------------------|
//! | `parallel` | on      | Batch searches run on a Rayon thread pool.            |
//! | `serde`    | off     | Derives `Serialize`/`Deserialize` on report records.  |

pub mod isolines;
pub mod mcf;
pub mod mst;
pub mod odmatrix;
pub mod pool;
pub mod report;
pub mod simple;
pub mod sptree;
pub mod transportation;

#[cfg(test)]
mod tests;

pub use isolines::{IsolinesReport, IsolinesSolver, OriginIsolines, ReachedArc, ReachedNode};
pub use mcf::{FlowRecord, McfReport, MinCostFlowSolver};
pub use mst::{MinSpanningTreeSolver, MstReport, TreeArc};
pub use odmatrix::{OdMatrix, OdMatrixSolver, PathCost};
pub use pool::WorkerPool;
pub use report::{Rejected, Route};
pub use sptree::{RouteRecord, ShortestPathTreeSolver, SptReport};
pub use transportation::{CostEntry, Distribution, TransportationReport, TransportationSolver};

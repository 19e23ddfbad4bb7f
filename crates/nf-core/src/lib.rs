//! `nf-core`: foundational types for the `netflow` network-analysis engine.
//!
//! This crate is a dependency of every other `nf-*` crate.  It has no `nf-*`
//! dependencies and minimal external ones (`thiserror`, `tracing`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `ArcId` (dense internal indices)               |
//! | [`ext`]        | `ExtId` (stable external identifier)                     |
//! | [`geo`]        | `GeoPoint`, haversine distance                           |
//! | [`flow`]       | `FlowStatus`, `FlowInstanceType`                         |
//! | [`config`]     | `SolverConfig`, `GeometryHandling`, `StopRule`           |
//! | [`observer`]   | `SolveObserver`, `NoopObserver`, `TracingObserver`       |
//! | [`error`]      | `NfError`, `MalformedInput`, `NfResult`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ext;
pub mod flow;
pub mod geo;
pub mod ids;
pub mod observer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GeometryHandling, SolverConfig, StopRule};
pub use error::{IdKind, MalformedInput, NfError, NfResult};
pub use ext::ExtId;
pub use flow::{FlowInstanceType, FlowStatus};
pub use geo::GeoPoint;
pub use ids::{ArcId, NodeId};
pub use observer::{NoopObserver, SolveObserver, TracingObserver};

/// Tolerance used for flow and cost comparisons throughout the engine.
pub const EPSILON: f64 = 1e-9;

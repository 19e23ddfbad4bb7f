//! Engine error type.
//!
//! Unreachable destinations and infeasible or unbounded flow problems are
//! *results*, not errors: they are reported through `Option`, `PathCost` and
//! [`FlowStatus`](crate::FlowStatus).  `NfError` only covers calls that
//! cannot proceed at all.

use std::fmt;

use thiserror::Error;

use crate::ArcId;

/// Which identifier space an [`NfError::InvalidIdentifier`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdKind {
    Node,
    Arc,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Node => f.write_str("node"),
            IdKind::Arc => f.write_str("arc"),
        }
    }
}

/// Input rejected at solve entry, before any labeling or pivoting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedInput {
    #[error("arc {arc} has negative cost {cost}")]
    NegativeCost { arc: ArcId, cost: f64 },

    #[error("arc {arc} has non-finite cost {cost}")]
    NonFiniteCost { arc: ArcId, cost: f64 },

    #[error("arc {arc} has invalid capacity {capacity}")]
    NegativeCapacity { arc: ArcId, capacity: f64 },

    #[error("total supply {supply} does not match total demand {demand}")]
    Imbalance { supply: f64, demand: f64 },

    #[error("quantity {quantity} at `{id}` is not a non-negative number")]
    InvalidQuantity { id: String, quantity: f64 },

    #[error("cost {cost} from `{origin}` to `{destination}` is not finite")]
    InvalidPairCost { origin: String, destination: String, cost: f64 },

    #[error("cutoff {0} is not a non-negative number")]
    InvalidCutoff(f64),

    #[error("split ratio {0} is not strictly between 0 and 1")]
    InvalidSplitRatio(f64),
}

/// The error type shared by every `nf-*` crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NfError {
    #[error("unknown {kind} identifier `{id}`")]
    InvalidIdentifier { kind: IdKind, id: String },

    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl NfError {
    pub fn unknown_node(id: impl fmt::Display) -> Self {
        NfError::InvalidIdentifier { kind: IdKind::Node, id: id.to_string() }
    }

    pub fn unknown_arc(id: impl fmt::Display) -> Self {
        NfError::InvalidIdentifier { kind: IdKind::Arc, id: id.to_string() }
    }
}

/// Shorthand result type for all `nf-*` crates.
pub type NfResult<T> = Result<T, NfError>;

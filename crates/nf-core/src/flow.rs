//! Min-cost-flow outcome and instance classification.

use std::fmt;

/// Outcome of a min-cost-flow solve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowStatus {
    /// No entering arc with negative reduced cost remains.
    Optimal,
    /// Supplies cannot be routed to demands within the arc capacities.
    Infeasible,
    /// A negative-cost cycle of unlimited capacity exists.
    Unbounded,
    /// The final flow failed the conservation or capacity check.
    Error,
}

impl FlowStatus {
    #[inline]
    pub fn is_optimal(self) -> bool {
        self == FlowStatus::Optimal
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowStatus::Optimal => "optimal",
            FlowStatus::Infeasible => "infeasible",
            FlowStatus::Unbounded => "unbounded",
            FlowStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Relation between total supply and total demand of a network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowInstanceType {
    Balanced,
    /// More supply than demand; some supply stays at its source.
    ExtraSupply,
    /// More demand than supply; some demand stays unmet.
    ExtraDemand,
}

impl FlowInstanceType {
    /// Classify `supply` against `demand` (both non-negative totals).
    pub fn classify(supply: f64, demand: f64) -> Self {
        if (supply - demand).abs() <= crate::EPSILON * supply.max(demand).max(1.0) {
            FlowInstanceType::Balanced
        } else if supply > demand {
            FlowInstanceType::ExtraSupply
        } else {
            FlowInstanceType::ExtraDemand
        }
    }
}

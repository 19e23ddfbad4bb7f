//! Unit tests for nf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ArcId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(ArcId::INVALID.0, u32::MAX);
        assert!(!ArcId::default().is_valid());
        assert!(ArcId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(ArcId(7).to_string(), "ArcId(7)");
    }
}

#[cfg(test)]
mod ext {
    use std::collections::HashMap;

    use crate::ExtId;

    #[test]
    fn integer_and_text_forms_agree() {
        assert_eq!(ExtId::from(17u64), ExtId::from("17"));
        assert_eq!(ExtId::from(-3i64).as_str(), "-3");
    }

    #[test]
    fn lookup_by_str() {
        let mut m = HashMap::new();
        m.insert(ExtId::from("road-9"), 1);
        assert_eq!(m.get("road-9"), Some(&1));
    }

    #[test]
    fn empty_marks_synthetic() {
        assert!(ExtId::default().is_empty());
        assert!(!ExtId::from("a").is_empty());
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn lerp_midpoint() {
        let m = GeoPoint::new(0.0, 0.0).lerp(GeoPoint::new(2.0, 4.0), 0.5);
        assert_eq!(m, GeoPoint::new(1.0, 2.0));
    }
}

#[cfg(test)]
mod flow {
    use crate::{FlowInstanceType, FlowStatus};

    #[test]
    fn classify_instances() {
        assert_eq!(FlowInstanceType::classify(10.0, 10.0), FlowInstanceType::Balanced);
        assert_eq!(FlowInstanceType::classify(12.0, 10.0), FlowInstanceType::ExtraSupply);
        assert_eq!(FlowInstanceType::classify(8.0, 10.0), FlowInstanceType::ExtraDemand);
    }

    #[test]
    fn status_display() {
        assert_eq!(FlowStatus::Unbounded.to_string(), "unbounded");
        assert!(FlowStatus::Optimal.is_optimal());
        assert!(!FlowStatus::Infeasible.is_optimal());
    }
}

#[cfg(test)]
mod config {
    use crate::{NfError, SolverConfig, StopRule};

    #[test]
    fn default_is_valid() {
        let cfg = SolverConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.stop_rule, StopRule::AllDestinations);
        assert!(cfg.balance_flow);
    }

    #[test]
    fn rejects_unary_heap() {
        let cfg = SolverConfig { heap_cardinality: Some(1), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(NfError::Config(_))));
    }

    #[test]
    fn rejects_zero_threads() {
        let cfg = SolverConfig { num_threads: Some(0), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(NfError::Config(_))));
    }

    #[test]
    fn auto_arity_tracks_density() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.heap_arity(0, 0), 2);
        assert_eq!(cfg.heap_arity(10, 10), 2);
        assert_eq!(cfg.heap_arity(40, 10), 4);
        assert_eq!(cfg.heap_arity(10_000, 10), 16);

        let fixed = SolverConfig { heap_cardinality: Some(8), ..Default::default() };
        assert_eq!(fixed.heap_arity(10, 10), 8);
    }
}

#[cfg(test)]
mod error {
    use crate::{ArcId, IdKind, MalformedInput, NfError};

    #[test]
    fn messages() {
        let e = NfError::unknown_node("X9");
        assert_eq!(e.to_string(), "unknown node identifier `X9`");
        assert!(matches!(e, NfError::InvalidIdentifier { kind: IdKind::Node, .. }));

        let m: NfError = MalformedInput::NegativeCost { arc: ArcId(3), cost: -1.0 }.into();
        assert_eq!(m.to_string(), "malformed input: arc ArcId(3) has negative cost -1");
    }
}

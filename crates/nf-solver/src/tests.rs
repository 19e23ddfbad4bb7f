//! Unit and property tests for nf-solver.

#[cfg(test)]
mod helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use nf_core::{ExtId, FlowStatus, GeoPoint, NfError, SolveObserver, SolverConfig, StopRule};
    use nf_net::{ArcData, InternalNet, InternalNetBuilder};

    /// Directed graph, positions on a line of latitude 0:
    ///
    ///   1 →(1) 2 →(1) 3
    ///   1 ──────(5)──→ 3        4 isolated
    pub fn four_node() -> InternalNet {
        let mut b = InternalNetBuilder::new();
        let n1 = b.add_node_at("1", 0.0, GeoPoint::new(0.0, 0.0));
        let n2 = b.add_node_at("2", 0.0, GeoPoint::new(0.0, 1.0));
        let n3 = b.add_node_at("3", 0.0, GeoPoint::new(0.0, 2.0));
        b.add_node_at("4", 0.0, GeoPoint::new(0.0, 3.0));
        b.add_arc(n1, n2, ArcData::new(1.0).with_capacity(10.0).with_ext_id("12"));
        b.add_arc(n2, n3, ArcData::new(1.0).with_capacity(10.0).with_ext_id("23"));
        b.add_arc(n1, n3, ArcData::new(5.0).with_capacity(10.0).with_ext_id("13"));
        b.build().unwrap()
    }

    /// Origins A, B and destinations X, Y joined by direct arcs.
    pub fn two_by_two() -> InternalNet {
        let mut b = InternalNetBuilder::new();
        for (from, to, cost) in [("A", "X", 1.0), ("A", "Y", 4.0), ("B", "X", 3.0), ("B", "Y", 2.0)] {
            b.add_arc_ext(from, to, ArcData::new(cost).with_ext_id(format!("{from}{to}")));
        }
        b.build().unwrap()
    }

    /// Chain O →(4) A →(6) B →(5) C; reach costs 0, 4, 10, 15.
    pub fn chain() -> InternalNet {
        let mut b = InternalNetBuilder::new();
        b.add_arc_ext("O", "A", ArcData::new(4.0).with_ext_id("oa"));
        b.add_arc_ext("A", "B", ArcData::new(6.0).with_ext_id("ab"));
        b.add_arc_ext("B", "C", ArcData::new(5.0).with_ext_id("bc"));
        b.build().unwrap()
    }

    /// O →(1) X, O →(2) Y; Z isolated.
    pub fn fork() -> InternalNet {
        let mut b = InternalNetBuilder::new();
        b.add_arc_ext("O", "X", ArcData::new(1.0).with_ext_id("ox"));
        b.add_arc_ext("O", "Y", ArcData::new(2.0).with_ext_id("oy"));
        b.add_node("Z", 0.0);
        b.build().unwrap()
    }

    pub fn first_reached() -> SolverConfig {
        SolverConfig { stop_rule: StopRule::FirstReached, ..SolverConfig::default() }
    }

    pub fn two_threads() -> SolverConfig {
        SolverConfig { num_threads: Some(2), ..SolverConfig::default() }
    }

    #[derive(Default)]
    pub struct Recorder {
        pub starts:   AtomicUsize,
        pub ends:     AtomicUsize,
        pub origins:  Mutex<Vec<ExtId>>,
        pub rejected: AtomicUsize,
        pub flows:    Mutex<Vec<FlowStatus>>,
    }

    impl SolveObserver for Recorder {
        fn on_solve_start(&self, _solver: &'static str, _origins: usize) {
            self.starts.fetch_add(1, Ordering::Relaxed);
        }
        fn on_origin_done(&self, origin: &ExtId, _reached: usize) {
            self.origins.lock().unwrap().push(origin.clone());
        }
        fn on_rejected(&self, _error: &NfError) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
        fn on_flow_solved(&self, status: FlowStatus, _pivots: u64, _cost: f64) {
            self.flows.lock().unwrap().push(status);
        }
        fn on_solve_end(&self, _solver: &'static str, _elapsed: Duration) {
            self.ends.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ── Shortest-path-tree report ─────────────────────────────────────────────────

#[cfg(test)]
mod sptree {
    use nf_core::{ExtId, GeometryHandling, IdKind, NfError, SolverConfig};
    use nf_net::RouteShape;
    use crate::ShortestPathTreeSolver;
    use super::helpers::{first_reached, fork, four_node};

    fn ids(v: &[&str]) -> Vec<ExtId> {
        v.iter().map(|s| ExtId::from(*s)).collect()
    }

    #[test]
    fn routes_to_requested_destinations() {
        let net = four_node();
        let solver = ShortestPathTreeSolver::new(SolverConfig::default()).unwrap();
        let report = solver.solve(&net, "1", &["3", "4"]).unwrap();

        assert_eq!(report.routes.len(), 1);
        let r = &report.routes[0];
        assert_eq!(r.destination.as_str(), "3");
        assert_eq!(r.cost, 2.0);
        assert_eq!(r.route.nodes, ids(&["1", "2", "3"]));
        assert_eq!(r.route.arcs, ids(&["12", "23"]));
        assert!(r.route.shape.is_none());
        assert_eq!(report.unreached, ids(&["4"]));
        assert_eq!(report.optimum, 2.0);
    }

    #[test]
    fn all_destinations_when_none_given() {
        let net = four_node();
        let solver = ShortestPathTreeSolver::new(SolverConfig::default()).unwrap();
        let report = solver.solve::<&str>(&net, "1", &[]).unwrap();
        let dests: Vec<_> = report.routes.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(dests, vec!["2", "3"]);
        assert_eq!(report.optimum, 3.0);
        assert!(report.unreached.is_empty());
    }

    #[test]
    fn cutoff_and_geometry() {
        let net = four_node();
        let config = SolverConfig { geometry: GeometryHandling::StraightLines, ..SolverConfig::default() };
        let solver = ShortestPathTreeSolver::new(config).unwrap().with_cutoff(1.5);
        let report = solver.solve(&net, "1", &["2", "3"]).unwrap();
        assert_eq!(report.routes.len(), 1);
        assert_eq!(report.unreached, ids(&["3"]));
        match &report.routes[0].route.shape {
            RouteShape::Line(points) => assert_eq!(points.len(), 2),
            other => panic!("expected a straight line, got {other:?}"),
        }
    }

    #[test]
    fn first_reached_leaves_rest_unsearched() {
        let net = fork();
        let solver = ShortestPathTreeSolver::new(first_reached()).unwrap();
        let report = solver.solve(&net, "O", &["X", "Y"]).unwrap();
        assert_eq!(report.routes.len(), 1);
        assert_eq!(report.routes[0].destination.as_str(), "X");
        assert_eq!(report.unsearched, ids(&["Y"]));
        assert!(report.unreached.is_empty());

        // Nothing settles, so the frontier runs out instead.
        let report = solver.solve(&net, "O", &["Z"]).unwrap();
        assert_eq!(report.unreached, ids(&["Z"]));
        assert!(report.unsearched.is_empty());

        let report = ShortestPathTreeSolver::new(SolverConfig::default())
            .unwrap()
            .solve(&net, "O", &["X", "Y"])
            .unwrap();
        assert_eq!(report.routes.len(), 2);
        assert!(report.unsearched.is_empty());
    }

    #[test]
    fn unknown_origin_is_an_error() {
        let net = four_node();
        let solver = ShortestPathTreeSolver::new(SolverConfig::default()).unwrap();
        assert!(matches!(
            solver.solve(&net, "nope", &["3"]),
            Err(NfError::InvalidIdentifier { kind: IdKind::Node, .. })
        ));
    }
}

// ── Spanning-tree and flow reports ────────────────────────────────────────────

#[cfg(test)]
mod reports {
    use nf_core::{FlowInstanceType, FlowStatus, MalformedInput, NfError, SolverConfig};
    use nf_net::{ArcData, InternalNetBuilder};
    use crate::{MinCostFlowSolver, MinSpanningTreeSolver};
    use super::helpers::four_node;

    #[test]
    fn mst_report_uses_external_ids() {
        let net = four_node();
        let report = MinSpanningTreeSolver::new(SolverConfig::default()).unwrap().solve(&net).unwrap();
        let arcs: Vec<_> = report.arcs.iter().map(|a| a.arc.clone().unwrap().to_string()).collect();
        assert_eq!(arcs, vec!["12", "23"]);
        assert_eq!(report.optimum, 2.0);
        assert_eq!(report.tree_count, 2);
    }

    #[test]
    fn mst_of_one_component() {
        let net = four_node();
        let solver = MinSpanningTreeSolver::new(SolverConfig::default()).unwrap();

        let report = solver.solve_component(&net, "3").unwrap();
        let arcs: Vec<_> = report.arcs.iter().map(|a| a.arc.clone().unwrap().to_string()).collect();
        assert_eq!(arcs, vec!["12", "23"]);
        assert_eq!(report.optimum, 2.0);
        assert_eq!(report.tree_count, 1);

        let report = solver.solve_component(&net, "4").unwrap();
        assert!(report.arcs.is_empty());
        assert_eq!(report.optimum, 0.0);

        assert!(matches!(
            solver.solve_component(&net, "nope"),
            Err(NfError::InvalidIdentifier { .. })
        ));
    }

    fn surplus_net() -> nf_net::InternalNet {
        let mut b = InternalNetBuilder::new();
        let a = b.add_node("A", 5.0);
        let z = b.add_node("Z", -3.0);
        b.add_arc(a, z, ArcData::new(2.0).with_ext_id("az"));
        b.build().unwrap()
    }

    #[test]
    fn extra_supply_is_balanced() {
        let report = MinCostFlowSolver::new(SolverConfig::default()).unwrap().solve(&surplus_net()).unwrap();
        assert_eq!(report.status, FlowStatus::Optimal);
        assert_eq!(report.instance, FlowInstanceType::ExtraSupply);
        assert_eq!(report.optimum, 6.0);
        assert_eq!(report.flows.len(), 1, "dummy arcs are not reported");
        assert_eq!(report.flows[0].flow, 3.0);
        assert_eq!(report.flows[0].arc.as_ref().map(|a| a.as_str()), Some("az"));
    }

    #[test]
    fn extra_demand_is_balanced() {
        let mut b = InternalNetBuilder::new();
        let a = b.add_node("A", 2.0);
        let z = b.add_node("Z", -6.0);
        b.add_arc(a, z, ArcData::new(1.5));
        let report = MinCostFlowSolver::new(SolverConfig::default()).unwrap().solve(&b.build().unwrap()).unwrap();
        assert_eq!(report.status, FlowStatus::Optimal);
        assert_eq!(report.instance, FlowInstanceType::ExtraDemand);
        assert_eq!(report.optimum, 3.0);
        assert_eq!(report.flows[0].arc, None);
    }

    #[test]
    fn imbalance_rejected_without_balancing() {
        let config = SolverConfig { balance_flow: false, ..SolverConfig::default() };
        let err = MinCostFlowSolver::new(config).unwrap().solve(&surplus_net()).unwrap_err();
        assert!(matches!(err, NfError::MalformedInput(MalformedInput::Imbalance { .. })));
    }
}

// ── Origin-destination matrix ─────────────────────────────────────────────────

#[cfg(test)]
mod odmatrix {
    use nf_algo::{DijkstraSpt, ShortestPathEngine, SptQuery};
    use nf_core::{IdKind, NfError, SolverConfig};
    use crate::{OdMatrixSolver, PathCost};
    use super::helpers::{first_reached, fork, four_node, two_threads};

    #[test]
    fn cells_match_standalone_searches() {
        let net = four_node();
        let m = OdMatrixSolver::new(two_threads()).unwrap().solve(&net, &["3", "1", "2"], &["1", "2", "3", "4"]).unwrap();

        assert_eq!(m.origins.iter().map(|o| o.as_str()).collect::<Vec<_>>(), vec!["3", "1", "2"]);
        for (row, o) in m.origins.iter().enumerate() {
            let spt = DijkstraSpt::new().solve(&net, &SptQuery::to_all(net.node(o.as_str()).unwrap())).unwrap();
            for (col, d) in m.destinations.iter().enumerate() {
                let expected = spt
                    .distance(net.node(d.as_str()).unwrap())
                    .map_or(PathCost::NoPath, PathCost::Reached);
                assert_eq!(m.get(row, col), expected, "{o} → {d}");
            }
        }
        assert_eq!(m.cost("1", "3"), Some(PathCost::Reached(2.0)));
        assert_eq!(m.cost("3", "1"), Some(PathCost::NoPath));
        assert_eq!(m.cost("1", "4"), Some(PathCost::NoPath));
        assert_eq!(m.row(1), &[PathCost::Reached(0.0), PathCost::Reached(1.0), PathCost::Reached(2.0), PathCost::NoPath]);
    }

    #[test]
    fn unknown_ids_do_not_abort_the_batch() {
        let net = four_node();
        let m = OdMatrixSolver::new(two_threads()).unwrap().solve(&net, &["1", "ghost", "2"], &["3", "phantom"]).unwrap();

        assert_eq!(m.origins.len(), 2);
        assert_eq!(m.destinations.len(), 1);
        assert_eq!(m.get(0, 0), PathCost::Reached(2.0));
        assert_eq!(m.get(1, 0), PathCost::Reached(1.0));
        let rejected: Vec<_> = m.rejected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rejected, vec!["ghost", "phantom"]);
        assert!(m
            .rejected
            .iter()
            .all(|r| matches!(r.error, NfError::InvalidIdentifier { kind: IdKind::Node, .. })));
    }

    #[test]
    fn empty_destinations_mean_all_nodes() {
        let net = four_node();
        let m = OdMatrixSolver::new(SolverConfig::default()).unwrap().solve(&net, &["1"], &[]).unwrap();
        assert_eq!(m.destinations.len(), 4);
        assert_eq!(m.reached_count(), 3);
        assert_eq!(m.cells().count(), 4);
    }

    #[test]
    fn routes_kept_on_request() {
        let net = four_node();
        let config = SolverConfig { keep_routes: true, ..SolverConfig::default() };
        let m = OdMatrixSolver::new(config).unwrap().solve(&net, &["1"], &["3", "4"]).unwrap();
        let route = m.route(0, 0).unwrap();
        assert_eq!(route.arcs.len(), 2);
        assert!(m.route(0, 1).is_none());

        let plain = OdMatrixSolver::new(SolverConfig::default()).unwrap().solve(&net, &["1"], &["3"]).unwrap();
        assert!(plain.route(0, 0).is_none());
    }

    #[test]
    fn first_reached_cells_are_not_searched() {
        let net = fork();
        let solver = OdMatrixSolver::new(first_reached()).unwrap();
        let m = solver.solve(&net, &["O"], &["X", "Y"]).unwrap();
        assert_eq!(m.cost("O", "X"), Some(PathCost::Reached(1.0)));
        assert_eq!(m.cost("O", "Y"), Some(PathCost::NotSearched));
        assert_eq!(m.cost("O", "Y").and_then(PathCost::cost), None);
        assert_eq!(m.reached_count(), 1);

        let m = solver.solve(&net, &["O"], &["Z"]).unwrap();
        assert_eq!(m.cost("O", "Z"), Some(PathCost::NoPath));

        let m = OdMatrixSolver::new(SolverConfig::default()).unwrap().solve(&net, &["O"], &["X", "Y"]).unwrap();
        assert_eq!(m.row(0), &[PathCost::Reached(1.0), PathCost::Reached(2.0)]);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SolverConfig { num_threads: Some(0), ..SolverConfig::default() };
        assert!(matches!(OdMatrixSolver::new(config), Err(NfError::Config(_))));
        let config = SolverConfig { heap_cardinality: Some(1), ..SolverConfig::default() };
        assert!(matches!(OdMatrixSolver::new(config), Err(NfError::Config(_))));
    }
}

// ── Transportation ────────────────────────────────────────────────────────────

#[cfg(test)]
mod transportation {
    use nf_core::{FlowStatus, MalformedInput, NfError, SolverConfig};
    use crate::{CostEntry, TransportationReport, TransportationSolver};
    use super::helpers::{two_by_two, two_threads};

    fn table() -> Vec<CostEntry> {
        vec![
            CostEntry::new("A", "X", 1.0),
            CostEntry::new("A", "Y", 4.0),
            CostEntry::new("B", "X", 3.0),
            CostEntry::new("B", "Y", 2.0),
        ]
    }

    fn shipments(r: &TransportationReport) -> Vec<(String, String, f64)> {
        r.distribution
            .iter()
            .map(|d| (d.origin.to_string(), d.destination.to_string(), d.flow))
            .collect()
    }

    fn expected() -> Vec<(String, String, f64)> {
        vec![
            ("A".into(), "X".into(), 5.0),
            ("B".into(), "X".into(), 2.0),
            ("B".into(), "Y".into(), 3.0),
        ]
    }

    #[test]
    fn cost_table_instance() {
        let solver = TransportationSolver::new(SolverConfig::default()).unwrap();
        let r = solver
            .solve_with_costs(&table(), &[("A", 5.0), ("B", 5.0)], &[("X", 7.0), ("Y", 3.0)])
            .unwrap();
        assert_eq!(r.status, FlowStatus::Optimal);
        assert_eq!(r.optimum, 17.0);
        assert_eq!(r.delivered, 10.0);
        assert_eq!(shipments(&r), expected());
        assert!(r.rejected.is_empty());
    }

    #[test]
    fn network_instance_matches_cost_table() {
        let net = two_by_two();
        let solver = TransportationSolver::new(two_threads()).unwrap();
        let r = solver
            .solve_on_network(&net, &[("A", 5.0), ("B", 5.0)], &[("X", 7.0), ("Y", 3.0)])
            .unwrap();
        assert_eq!(r.status, FlowStatus::Optimal);
        assert_eq!(r.optimum, 17.0);
        assert_eq!(shipments(&r), expected());
    }

    #[test]
    fn delivery_capped_by_smaller_total() {
        let solver = TransportationSolver::new(SolverConfig::default()).unwrap();
        let r = solver
            .solve_with_costs(&table(), &[("A", 5.0), ("B", 5.0)], &[("X", 4.0)])
            .unwrap();
        assert_eq!(r.status, FlowStatus::Optimal);
        assert_eq!(r.delivered, 4.0);
        assert!(r.delivered <= r.total_supply.min(r.total_demand));
        assert_eq!(shipments(&r), vec![("A".into(), "X".into(), 4.0)]);

        let r = solver
            .solve_with_costs(&table(), &[("B", 2.0)], &[("X", 7.0), ("Y", 3.0)])
            .unwrap();
        assert_eq!(r.delivered, 2.0);
        assert_eq!(r.optimum, 4.0);
    }

    #[test]
    fn bad_entries_are_rejected() {
        let mut costs = table();
        costs.push(CostEntry::new("A", "Q", 1.0));
        costs.push(CostEntry::new("B", "Y", f64::NAN));
        let solver = TransportationSolver::new(SolverConfig::default()).unwrap();
        let r = solver
            .solve_with_costs(&costs, &[("A", 5.0), ("B", 5.0), ("C", -1.0)], &[("X", 7.0), ("Y", 3.0)])
            .unwrap();

        assert_eq!(r.optimum, 17.0);
        assert_eq!(r.rejected.len(), 3);
        assert!(r.rejected.iter().any(|e| matches!(
            e.error,
            NfError::MalformedInput(MalformedInput::InvalidQuantity { .. })
        )));
        assert!(r.rejected.iter().any(|e| e.id.as_str() == "Q"));
    }

    #[test]
    fn unreachable_pairs_make_it_infeasible() {
        let solver = TransportationSolver::new(SolverConfig::default()).unwrap();
        let r = solver
            .solve_with_costs(&[CostEntry::new("A", "X", 1.0)], &[("A", 5.0), ("B", 5.0)], &[("X", 10.0)])
            .unwrap();
        assert_eq!(r.status, FlowStatus::Infeasible);
    }
}

// ── Isolines ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod isolines {
    use nf_core::{MalformedInput, NfError, SolverConfig};
    use crate::IsolinesSolver;
    use super::helpers::chain;

    #[test]
    fn cutoff_excludes_far_node() {
        let net = chain();
        let report = IsolinesSolver::new(SolverConfig::default())
            .unwrap()
            .solve(&net, &[("O", vec![10.0])])
            .unwrap();
        let iso = &report.origins[0];
        let nodes: Vec<_> = iso.nodes.iter().map(|n| (n.node.as_str(), n.cost)).collect();
        assert_eq!(nodes, vec![("O", 0.0), ("A", 4.0), ("B", 10.0)]);
        assert!(iso.nodes.iter().all(|n| n.cost <= 10.0));
        let arcs: Vec<_> = iso.arcs.iter().map(|a| a.arc.as_ref().unwrap().as_str()).collect();
        assert_eq!(arcs, vec!["oa", "ab"], "an arc starting on the boundary has no reachable share");
    }

    #[test]
    fn bands_and_partial_arcs() {
        let net = chain();
        let report = IsolinesSolver::new(SolverConfig::default())
            .unwrap()
            .solve(&net, &[("O", vec![12.0, 5.0, 5.0])])
            .unwrap();
        let iso = &report.origins[0];
        assert_eq!(iso.cutoffs, vec![5.0, 12.0]);
        let bands: Vec<_> = iso.nodes.iter().map(|n| (n.node.as_str(), n.band)).collect();
        assert_eq!(bands, vec![("O", 0), ("A", 0), ("B", 1)]);
        assert_eq!(iso.nodes_within(0).count(), 2);

        let bc = iso.arcs.iter().find(|a| a.from.as_str() == "B").unwrap();
        assert_eq!(bc.start_cost, 10.0);
        assert_eq!(bc.end_cost, 15.0);
        assert!((bc.fraction - 0.4).abs() < 1e-12);
        assert!(iso.arcs.iter().filter(|a| a.from.as_str() != "B").all(|a| a.fraction == 1.0));
    }

    #[test]
    fn bad_entries_are_rejected_per_origin() {
        let net = chain();
        let report = IsolinesSolver::new(SolverConfig::default())
            .unwrap()
            .solve(&net, &[("O", vec![-1.0]), ("Z", vec![3.0]), ("A", vec![]), ("A", vec![6.0])])
            .unwrap();
        assert_eq!(report.origins.len(), 1);
        assert_eq!(report.origins[0].origin.as_str(), "A");
        assert_eq!(report.rejected.len(), 3);
        assert!(matches!(
            report.rejected[0].error,
            NfError::MalformedInput(MalformedInput::InvalidCutoff(c)) if c == -1.0
        ));
    }
}

// ── Observer & wrappers ───────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use nf_core::{FlowStatus, SolverConfig};
    use crate::{OdMatrixSolver, TransportationSolver, simple};
    use super::helpers::{Recorder, chain, four_node, two_by_two, two_threads};

    #[test]
    fn batch_callbacks() {
        let rec = Arc::new(Recorder::default());
        let solver = OdMatrixSolver::new(two_threads()).unwrap().with_observer(rec.clone());
        solver.solve(&four_node(), &["1", "2", "missing"], &["3"]).unwrap();

        assert_eq!(rec.starts.load(Ordering::Relaxed), 1);
        assert_eq!(rec.ends.load(Ordering::Relaxed), 1);
        assert_eq!(rec.rejected.load(Ordering::Relaxed), 1);
        let mut done: Vec<_> = rec.origins.lock().unwrap().iter().map(|o| o.to_string()).collect();
        done.sort();
        assert_eq!(done, vec!["1", "2"]);
    }

    #[test]
    fn flow_callbacks() {
        let rec = Arc::new(Recorder::default());
        let solver = TransportationSolver::new(SolverConfig::default()).unwrap().with_observer(rec.clone());
        solver
            .solve_on_network(&two_by_two(), &[("A", 5.0), ("B", 5.0)], &[("X", 7.0), ("Y", 3.0)])
            .unwrap();
        assert_eq!(*rec.flows.lock().unwrap(), vec![FlowStatus::Optimal]);
        assert_eq!(rec.origins.lock().unwrap().len(), 2);
    }

    #[test]
    fn simple_wrappers() {
        let net = four_node();
        assert_eq!(simple::shortest_path_tree(&net, "1", &["3"]).unwrap().optimum, 2.0);
        assert_eq!(simple::minimum_spanning_tree(&net).unwrap().optimum, 2.0);
        assert_eq!(simple::od_matrix(&net, &["1"], &["2"]).unwrap().reached_count(), 1);
        assert_eq!(simple::min_cost_flow(&net).unwrap().optimum, 0.0);
        let iso = simple::isolines(&chain(), &["O"], 4.0).unwrap();
        assert_eq!(iso.origins[0].nodes.len(), 2);
        let t = simple::transportation(&two_by_two(), &[("A", 5.0), ("B", 5.0)], &[("X", 7.0), ("Y", 3.0)]).unwrap();
        assert_eq!(t.optimum, 17.0);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use nf_algo::{DijkstraSpt, ShortestPathEngine, SptQuery};
    use nf_core::FlowStatus;
    use nf_net::{ArcData, InternalNetBuilder};
    use crate::{CostEntry, OdMatrixSolver, PathCost, TransportationSolver};
    use super::helpers::two_threads;

    proptest! {
        #[test]
        fn od_cells_equal_single_searches(
            n in 2usize..10,
            arcs in prop::collection::vec((0usize..10, 0usize..10, 0u32..15), 0..30),
        ) {
            let mut b = InternalNetBuilder::new();
            let nodes: Vec<_> = (0..n).map(|i| b.add_node(i, 0.0)).collect();
            for &(u, v, c) in &arcs {
                b.add_arc(nodes[u % n], nodes[v % n], ArcData::new(c as f64));
            }
            let net = b.build().unwrap();
            let ids: Vec<String> = (0..n).map(|i| i.to_string()).collect();

            let m = OdMatrixSolver::new(two_threads()).unwrap().solve(&net, &ids, &ids).unwrap();
            for (row, &o) in nodes.iter().enumerate() {
                let spt = DijkstraSpt::new().solve(&net, &SptQuery::to_all(o)).unwrap();
                for (col, &d) in nodes.iter().enumerate() {
                    let expected = spt.distance(d).map_or(PathCost::NoPath, PathCost::Reached);
                    prop_assert_eq!(m.get(row, col), expected);
                }
            }
        }

        #[test]
        fn transportation_delivers_min_total(
            supplies in prop::collection::vec(0u32..20, 1..5),
            demands in prop::collection::vec(0u32..20, 1..5),
            seed_costs in prop::collection::vec(1u32..30, 25),
        ) {
            let origins: Vec<(String, f64)> =
                supplies.iter().enumerate().map(|(i, &s)| (format!("o{i}"), s as f64)).collect();
            let dests: Vec<(String, f64)> =
                demands.iter().enumerate().map(|(j, &d)| (format!("d{j}"), d as f64)).collect();
            let mut costs = Vec::new();
            for (i, (o, _)) in origins.iter().enumerate() {
                for (j, (d, _)) in dests.iter().enumerate() {
                    costs.push(CostEntry::new(o.as_str(), d.as_str(), seed_costs[i * 5 + j] as f64));
                }
            }

            let r = TransportationSolver::new(Default::default())
                .unwrap()
                .solve_with_costs(&costs, &origins, &dests)
                .unwrap();
            prop_assert_eq!(r.status, FlowStatus::Optimal);
            let target = r.total_supply.min(r.total_demand);
            prop_assert!((r.delivered - target).abs() < 1e-9);
            let cost: f64 = r.distribution.iter().map(|d| d.cost).sum();
            prop_assert!((cost - r.optimum).abs() < 1e-9);
        }
    }
}

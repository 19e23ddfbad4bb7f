//! grid: end-to-end tour of the netflow solvers.
//!
//! Loads a 6×6 city-block network from generated CSV tables and runs every
//! solver on it: shortest-path tree, spanning tree, min-cost flow, OD
//! matrix, transportation and isolines.  Set `RUST_LOG=debug` to see solver
//! progress from the tracing observer.

mod network;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nf_core::{GeometryHandling, SolveObserver, SolverConfig, TracingObserver};
use nf_net::RouteShape;
use nf_solver::{
    IsolinesSolver, MinCostFlowSolver, MinSpanningTreeSolver, OdMatrixSolver, PathCost,
    ShortestPathTreeSolver, TransportationSolver,
};

use network::{CUSTOMERS, DEPOTS, SIZE, build_network, node_name};

// ── Constants ─────────────────────────────────────────────────────────────────

const CUTOFFS_MIN: [f64; 3] = [2.0, 4.0, 6.0];
const OUTPUT_DIR:  &str     = "output/grid";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    println!("=== grid — netflow solver tour ===");

    // 1. Network.
    let net = build_network()?;
    println!(
        "Network: {} nodes, {} arcs, supply {} / demand {}",
        net.node_count(),
        net.arc_count(),
        net.total_supply(),
        net.total_demand()
    );
    println!();

    let observer: Arc<dyn SolveObserver> = Arc::new(TracingObserver);
    let config = SolverConfig {
        geometry: GeometryHandling::EncodedPolyline,
        ..SolverConfig::default()
    };
    let t0 = Instant::now();

    // 2. Shortest-path tree from the north-west corner.
    let corner = node_name(0, 0);
    let far = node_name(SIZE - 1, SIZE - 1);
    let spt = ShortestPathTreeSolver::new(config.clone())?
        .with_observer(observer.clone())
        .solve(&net, &corner, &[far.as_str()])?;
    for r in &spt.routes {
        println!("SPT {} → {}: {:.1} min over {} segments", r.origin, r.destination, r.cost, r.route.arcs.len());
        if let RouteShape::Encoded(polyline) = &r.route.shape {
            println!("    polyline {polyline}");
        }
    }

    // 3. Spanning tree.
    let mst = MinSpanningTreeSolver::new(config.clone())?.with_observer(observer.clone()).solve(&net)?;
    println!("MST: {} arcs, {:.1} min total, {} tree(s)", mst.arcs.len(), mst.optimum, mst.tree_count);

    // 4. Min-cost flow on the node supplies.
    let mcf = MinCostFlowSolver::new(config.clone())?.with_observer(observer.clone()).solve(&net)?;
    println!(
        "MCF: {} ({:?}), cost {:.1}, {} arcs carry flow, {} pivots",
        mcf.status,
        mcf.instance,
        mcf.optimum,
        mcf.flows.len(),
        mcf.pivots
    );
    println!();

    // 5. OD matrix depots × customers.
    let depots: Vec<&str> = DEPOTS.iter().map(|&(id, _)| id).collect();
    let customers: Vec<&str> = CUSTOMERS.iter().map(|&(id, _)| id).collect();
    let od = OdMatrixSolver::new(config.clone())?
        .with_observer(observer.clone())
        .solve(&net, &depots, &customers)?;
    print!("{:<8}", "OD");
    for d in &od.destinations {
        print!("{:>8}", d.as_str());
    }
    println!();
    for (row, o) in od.origins.iter().enumerate() {
        print!("{:<8}", o.as_str());
        for cell in od.row(row) {
            match cell {
                PathCost::Reached(c) => print!("{c:>8.1}"),
                PathCost::NoPath => print!("{:>8}", "-"),
                PathCost::NotSearched => print!("{:>8}", "?"),
            }
        }
        println!();
    }
    println!();

    // 6. Transportation depots → customers.
    let transport = TransportationSolver::new(config.clone())?
        .with_observer(observer.clone())
        .solve_on_network(&net, &DEPOTS[..], &CUSTOMERS[..])?;
    println!(
        "Transportation: {}, delivered {} of {} demanded, cost {:.1}",
        transport.status, transport.delivered, transport.total_demand, transport.optimum
    );
    for d in &transport.distribution {
        println!("    {:<6} → {:<6} {:>5} units @ {:.1}", d.origin.as_str(), d.destination.as_str(), d.flow, d.unit_cost);
    }
    println!();

    // 7. Isolines around the grid centre.
    let centre = node_name(SIZE / 2, SIZE / 2);
    let iso = IsolinesSolver::new(config)?
        .with_observer(observer)
        .solve(&net, &[(centre.as_str(), CUTOFFS_MIN.to_vec())])?;
    for o in &iso.origins {
        for (band, cutoff) in o.cutoffs.iter().enumerate() {
            println!("Isoline {} ≤ {cutoff} min: {} nodes", o.origin, o.nodes_within(band).count());
        }
        let partial = o.arcs.iter().filter(|a| a.fraction < 1.0).count();
        println!("    {} arcs reached, {partial} cut by the outer band", o.arcs.len());
    }
    println!();
    println!("All solvers done in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);

    // 8. JSON reports.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let dir = Path::new(OUTPUT_DIR);
    std::fs::write(dir.join("od_matrix.json"), serde_json::to_string_pretty(&od)?)?;
    std::fs::write(dir.join("transportation.json"), serde_json::to_string_pretty(&transport)?)?;
    std::fs::write(dir.join("isolines.json"), serde_json::to_string_pretty(&iso)?)?;
    println!("Reports written to {OUTPUT_DIR}/");

    Ok(())
}

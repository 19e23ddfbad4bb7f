//! Synthetic city-block network.
//!
//! A `SIZE × SIZE` grid of intersections about 400 m apart near Mobile, AL.
//! Streets are two-way except the avenue along row 0, which runs east only.
//! The tables are generated as CSV with provider-style column names so the
//! demo goes through the same loader as real data.

use std::fmt::Write;
use std::io::Cursor;

use anyhow::Result;

use nf_net::{ColumnMap, InternalNet, InternalNetBuilder, load_arcs_reader, load_nodes_reader};

pub const SIZE: usize = 6;

const ORIGIN_LAT: f64 = 30.670;
const ORIGIN_LON: f64 = -88.080;
const STEP_DEG:   f64 = 0.0036; // ~400 m

/// Depots and their supplies; customers and their demands.
pub const DEPOTS:    [(&str, f64); 2] = [("n0_0", 30.0), ("n5_5", 20.0)];
pub const CUSTOMERS: [(&str, f64); 4] = [("n0_5", 10.0), ("n2_2", 15.0), ("n3_0", 5.0), ("n5_1", 15.0)];

pub fn node_name(row: usize, col: usize) -> String {
    format!("n{row}_{col}")
}

fn nodes_csv() -> Result<String> {
    let mut out = String::from("junction,y,x,qty\n");
    for row in 0..SIZE {
        for col in 0..SIZE {
            let name = node_name(row, col);
            let qty = DEPOTS
                .iter()
                .copied()
                .chain(CUSTOMERS.iter().map(|&(id, d)| (id, -d)))
                .find(|(id, _)| *id == name)
                .map(|(_, q)| q.to_string())
                .unwrap_or_default();
            let lat = ORIGIN_LAT + row as f64 * STEP_DEG;
            let lon = ORIGIN_LON + col as f64 * STEP_DEG;
            writeln!(out, "{name},{lat:.5},{lon:.5},{qty}")?;
        }
    }
    Ok(out)
}

/// Travel minutes grow toward the east edge; the avenue is quicker.
fn arcs_csv() -> Result<String> {
    let mut out = String::from("seg,a,b,minutes,veh_per_h,one_way\n");
    for row in 0..SIZE {
        for col in 0..SIZE {
            let here = node_name(row, col);
            if col + 1 < SIZE {
                let (minutes, oneway) = if row == 0 { (0.6, "Y") } else { (1.0 + col as f64 * 0.1, "N") };
                writeln!(out, "h{row}_{col},{here},{},{minutes:.1},40,{oneway}", node_name(row, col + 1))?;
            }
            if row + 1 < SIZE {
                writeln!(out, "v{row}_{col},{here},{},1.2,25,", node_name(row + 1, col))?;
            }
        }
    }
    Ok(out)
}

/// Build the grid through the CSV loader.
pub fn build_network() -> Result<InternalNet> {
    let map = ColumnMap {
        arc_id:    "seg".into(),
        from_node: "a".into(),
        to_node:   "b".into(),
        cost:      "minutes".into(),
        capacity:  Some("veh_per_h".into()),
        oneway:    Some("one_way".into()),
        node_id:   "junction".into(),
        supply:    Some("qty".into()),
        lat:       Some("y".into()),
        lon:       Some("x".into()),
    };

    let mut b = InternalNetBuilder::new();
    load_nodes_reader(&mut b, Cursor::new(nodes_csv()?), &map)?;
    load_arcs_reader(&mut b, Cursor::new(arcs_csv()?), &map, true)?;
    Ok(b.build()?)
}

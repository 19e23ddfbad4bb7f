//! CSV arc and node tables.
//!
//! # Column mapping
//!
//! Source tables name their columns however the data provider likes.  A
//! [`ColumnMap`] says which column holds what; the loader renames the header
//! row to canonical names and deserializes each row into a fixed record.
//!
//! ```csv
//! edge,src,dst,minutes,cap,ow
//! r1,A,B,4.5,100,Y
//! r2,B,C,3.0,,
//! ```
//!
//! # Direction
//!
//! | Network    | `oneway` mapped | Row becomes                                   |
//! |------------|-----------------|-----------------------------------------------|
//! | undirected | ignored         | arcs in both directions                       |
//! | directed   | no              | one arc `from → to`                           |
//! | directed   | yes             | `Y` → one arc, anything else → both directions |
//!
//! An empty capacity cell means uncapacitated; an empty supply cell means 0.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nf_core::{ExtId, GeoPoint};

use crate::{ArcData, InternalNet, InternalNetBuilder, NetError, NetResult};

// ── ColumnMap ─────────────────────────────────────────────────────────────────

/// Names of the source columns holding each attribute.
#[derive(Clone, Debug, PartialEq, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ColumnMap {
    pub arc_id:    String,
    pub from_node: String,
    pub to_node:   String,
    pub cost:      String,
    pub capacity:  Option<String>,
    pub oneway:    Option<String>,
    pub node_id:   String,
    pub supply:    Option<String>,
    pub lat:       Option<String>,
    pub lon:       Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            arc_id:    "arc_id".into(),
            from_node: "from".into(),
            to_node:   "to".into(),
            cost:      "cost".into(),
            capacity:  None,
            oneway:    None,
            node_id:   "node_id".into(),
            supply:    None,
            lat:       None,
            lon:       None,
        }
    }
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ArcRecord {
    arc_id:   String,
    from:     String,
    to:       String,
    cost:     f64,
    #[serde(default)]
    capacity: Option<f64>,
    #[serde(default)]
    oneway:   Option<String>,
}

#[derive(Deserialize)]
struct NodeRecord {
    node_id: String,
    #[serde(default)]
    supply:  Option<f64>,
    #[serde(default)]
    lat:     Option<f64>,
    #[serde(default)]
    lon:     Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build a network from an arc table and an optional node table.
pub fn load_csv(
    arcs:     &Path,
    nodes:    Option<&Path>,
    map:      &ColumnMap,
    directed: bool,
) -> NetResult<InternalNet> {
    let mut b = InternalNetBuilder::new();
    if let Some(path) = nodes {
        load_nodes_reader(&mut b, std::fs::File::open(path)?, map)?;
    }
    load_arcs_reader(&mut b, std::fs::File::open(arcs)?, map, directed)?;
    Ok(b.build()?)
}

/// Read node rows into `b`.  Returns the number of rows read.
///
/// Load nodes before arcs so that arcs find their supplies in place.
pub fn load_nodes_reader<R: Read>(
    b:      &mut InternalNetBuilder,
    reader: R,
    map:    &ColumnMap,
) -> NetResult<usize> {
    let columns = [
        (Some(&map.node_id), "node_id", true),
        (map.supply.as_ref(), "supply", false),
        (map.lat.as_ref(), "lat", false),
        (map.lon.as_ref(), "lon", false),
    ];
    let mut csv_reader = canonical_reader(reader, &columns)?;

    let mut rows = 0;
    for (i, result) in csv_reader.deserialize::<NodeRecord>().enumerate() {
        let row = result.map_err(|e| parse_error(i, e))?;
        let id = b.add_node(row.node_id.trim(), 0.0);
        b.set_supply(id, row.supply.unwrap_or(0.0));
        if let (Some(lat), Some(lon)) = (row.lat, row.lon) {
            b.set_position(id, GeoPoint::new(lat, lon));
        }
        rows += 1;
    }
    Ok(rows)
}

/// Read arc rows into `b`, creating unknown endpoint nodes as transshipment
/// nodes.  Returns the number of directed arcs added.
pub fn load_arcs_reader<R: Read>(
    b:        &mut InternalNetBuilder,
    reader:   R,
    map:      &ColumnMap,
    directed: bool,
) -> NetResult<usize> {
    let columns = [
        (Some(&map.arc_id), "arc_id", true),
        (Some(&map.from_node), "from", true),
        (Some(&map.to_node), "to", true),
        (Some(&map.cost), "cost", true),
        (map.capacity.as_ref(), "capacity", false),
        (map.oneway.as_ref(), "oneway", false),
    ];
    let mut csv_reader = canonical_reader(reader, &columns)?;
    let honor_oneway = directed && map.oneway.is_some();

    let mut added = 0;
    for (i, result) in csv_reader.deserialize::<ArcRecord>().enumerate() {
        let row = result.map_err(|e| parse_error(i, e))?;
        let from = b.add_node(row.from.trim(), 0.0);
        let to = b.add_node(row.to.trim(), 0.0);
        if from == to {
            tracing::warn!(arc = %row.arc_id, node = %row.from, "self-loop in arc table");
        }

        let data = ArcData {
            ext_id:   Some(ExtId::from(row.arc_id.trim())),
            cost:     row.cost,
            capacity: row.capacity.unwrap_or(f64::INFINITY),
        };
        let single = if honor_oneway {
            row.oneway.as_deref().is_some_and(|v| v.trim().eq_ignore_ascii_case("y"))
        } else {
            directed
        };
        if single {
            b.add_arc(from, to, data);
            added += 1;
        } else {
            b.add_undirected_arc(from, to, data);
            added += 2;
        }
    }
    Ok(added)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Open a CSV reader whose header row is rewritten to canonical names.
///
/// `columns` lists `(source column, canonical name, required)`.  Unmapped
/// source columns are renamed out of the way so they cannot collide with a
/// canonical name.
fn canonical_reader<R: Read>(
    reader:  R,
    columns: &[(Option<&String>, &str, bool)],
) -> NetResult<csv::Reader<R>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    for &(source, canonical, required) in columns {
        match source {
            Some(name) if !headers.iter().any(|h| h == name.as_str()) => {
                return Err(NetError::MissingColumn(name.clone()));
            }
            None if required => return Err(NetError::MissingColumn(canonical.to_owned())),
            _ => {}
        }
    }

    let renamed: csv::StringRecord = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            columns
                .iter()
                .find(|(source, _, _)| source.is_some_and(|s| s.as_str() == h))
                .map(|&(_, canonical, _)| canonical.to_owned())
                .unwrap_or_else(|| format!("__unmapped_{i}"))
        })
        .collect();
    csv_reader.set_headers(renamed);
    Ok(csv_reader)
}

fn parse_error(row: usize, e: csv::Error) -> NetError {
    NetError::Parse { row: row + 1, message: e.to_string() }
}

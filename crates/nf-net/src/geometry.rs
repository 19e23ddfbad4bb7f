//! Route geometry handed back with solver results.
//!
//! Pure pass-through: shapes are assembled from node positions owned by the
//! caller's data and never feed back into solver math.

use nf_core::{ArcId, GeoPoint, GeometryHandling, NodeId};

use crate::InternalNet;

/// Geometry of one route, in the form requested by [`GeometryHandling`].
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteShape {
    /// Not requested, or a node on the route has no position.
    #[default]
    None,
    /// Vertices in travel order.
    Line(Vec<GeoPoint>),
    /// Google encoded polyline, precision 5.
    Encoded(String),
}

impl RouteShape {
    pub fn is_none(&self) -> bool {
        matches!(self, RouteShape::None)
    }
}

impl InternalNet {
    /// Shape of the route from `origin` to `dest` along `path`.
    pub fn route_shape(
        &self,
        origin: NodeId,
        dest:   NodeId,
        path:   &[ArcId],
        mode:   GeometryHandling,
    ) -> RouteShape {
        match mode {
            GeometryHandling::NoGeometry => RouteShape::None,
            GeometryHandling::StraightLines => {
                match (self.node_position(origin), self.node_position(dest)) {
                    (Some(a), Some(b)) => RouteShape::Line(vec![a, b]),
                    _ => RouteShape::None,
                }
            }
            GeometryHandling::ActualRoute => match self.path_points(origin, path) {
                Some(points) => RouteShape::Line(points),
                None => RouteShape::None,
            },
            GeometryHandling::EncodedPolyline => match self.path_points(origin, path) {
                Some(points) => RouteShape::Encoded(encode_polyline(&points)),
                None => RouteShape::None,
            },
        }
    }

    /// Positions of `origin` and every arc target along `path`.
    fn path_points(&self, origin: NodeId, path: &[ArcId]) -> Option<Vec<GeoPoint>> {
        let mut points = Vec::with_capacity(path.len() + 1);
        points.push(self.node_position(origin)?);
        for &arc in path {
            points.push(self.node_position(self.arc_target(arc))?);
        }
        Some(points)
    }
}

/// Encode `points` with the Google polyline algorithm at precision 5.
pub fn encode_polyline(points: &[GeoPoint]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);
    for p in points {
        let lat = (p.lat * 1e5).round() as i64;
        let lon = (p.lon * 1e5).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}

fn encode_value(delta: i64, out: &mut String) {
    let shifted = delta << 1;
    let mut v = (if delta < 0 { !shifted } else { shifted }) as u64;
    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}

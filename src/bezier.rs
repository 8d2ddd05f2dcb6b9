use crate::geometry_utilities::types::CanvasPoint;
use crate::geometry_utilities::{midpoint, CyclicSlice};
use crate::polygon::BasePolygon;
use crate::vertex::{CurveColor, Vertex};

pub const BEZIER_POINTS_PER_SEGMENT: usize = 4;

/// One cubic segment per polygon vertex, running from near `P[i]` to near `P[i+1]`.
///
/// The inner control points sit at the thirds of the edge `P[i] -> P[i+1]`. The outer
/// ones are averaged with the neighbouring segment's inner point, which makes
/// consecutive segments meet at a shared point.
pub fn bezier_segments(points: &[CanvasPoint]) -> Vec<[CanvasPoint; 4]> {
    let cyclic = CyclicSlice::new(points);
    (0..points.len())
        .map(|i| {
            let prev = cyclic.neighbour(i, -1).to_vector();
            let current = points[i].to_vector();
            let next = cyclic.neighbour(i, 1).to_vector();
            let next2 = cyclic.neighbour(i, 2).to_vector();

            let c1 = ((current * 2.0 + next) / 3.0).to_point();
            let c2 = ((current + next * 2.0) / 3.0).to_point();
            let c0 = midpoint(((prev + current * 2.0) / 3.0).to_point(), c1);
            let c3 = midpoint(((next * 2.0 + next2) / 3.0).to_point(), c2);
            [c0, c1, c2, c3]
        })
        .collect()
}

/// `4N` yellow control points, segment `i` at slots `4i..4i+4`.
pub fn build_bezier(polygon: &BasePolygon) -> Vec<Vertex> {
    puffin::profile_function!();
    bezier_segments(&polygon.points())
        .iter()
        .flat_map(|segment| segment.iter().map(|&p| CurveColor::Bezier.vertex(p)))
        .collect()
}

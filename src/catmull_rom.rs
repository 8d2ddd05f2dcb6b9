use crate::geometry_utilities::types::CanvasPoint;
use crate::geometry_utilities::{de_casteljau, CyclicSlice};
use crate::polygon::BasePolygon;
use crate::vertex::{CurveColor, Vertex};

/// How far along the neighbour tangent the inner control points are placed.
pub const CATMULL_ROM_TENSION: f32 = 0.2;
pub const SAMPLES_PER_SEGMENT: usize = 15;

/// Control points and tessellated curve of a closed Catmull-Rom spline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatmullRomCurve {
    /// `4N` points, the cubic for edge `i -> i+1` at slots `4i..4i+4`.
    pub control_points: Vec<Vertex>,
    /// `15N` points, the samples of edge `i -> i+1` at slots `15i..15i+15`.
    pub curve_points: Vec<Vertex>,
}

/// Bezier control points of the segment `p1 -> p2`, with `p0` and `p3` as the outer neighbours.
pub fn catmull_rom_segment(
    p0: CanvasPoint,
    p1: CanvasPoint,
    p2: CanvasPoint,
    p3: CanvasPoint,
    tension: f32,
) -> [CanvasPoint; 4] {
    let tangent_start = p2 - p0;
    let tangent_end = p3 - p1;
    let c0 = p1;
    let c3 = p2;
    let c1 = c0 + tangent_start * tension;
    let c2 = c3 - tangent_end * tension;
    [c0, c1, c2, c3]
}

/// One segment per polygon edge, wrapping around at both ends.
pub fn catmull_rom_segments(points: &[CanvasPoint], tension: f32) -> Vec<[CanvasPoint; 4]> {
    let cyclic = CyclicSlice::new(points);
    (0..points.len())
        .map(|i| {
            catmull_rom_segment(
                *cyclic.neighbour(i, -1),
                points[i],
                *cyclic.neighbour(i, 1),
                *cyclic.neighbour(i, 2),
                tension,
            )
        })
        .collect()
}

/// Samples a segment at `u / samples` for `u` in `0..samples`.
///
/// The end point itself is left out since it is the first sample of the next segment.
pub fn tessellate_segment(control: &[CanvasPoint; 4], samples: usize) -> impl Iterator<Item = CanvasPoint> + '_ {
    (0..samples).map(move |u| de_casteljau(control, u as f32 / samples as f32))
}

pub fn build_catmull_rom(polygon: &BasePolygon) -> CatmullRomCurve {
    puffin::profile_function!();
    let segments = catmull_rom_segments(&polygon.points(), CATMULL_ROM_TENSION);

    let control_points = segments
        .iter()
        .flat_map(|segment| segment.iter().map(|&p| CurveColor::CatmullRomControl.vertex(p)))
        .collect();
    let curve_points = segments
        .iter()
        .flat_map(|segment| tessellate_segment(segment, SAMPLES_PER_SEGMENT))
        .map(|p| CurveColor::CatmullRomCurve.vertex(p))
        .collect();

    CatmullRomCurve {
        control_points,
        curve_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::default_points;
    use approx::assert_abs_diff_eq;
    use euclid::point2 as point;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Whether `p` lies in the triangle `abc`, allowing `tolerance` of slack outside each edge.
    fn triangle_contains(a: CanvasPoint, b: CanvasPoint, c: CanvasPoint, p: CanvasPoint, tolerance: f32) -> bool {
        let orientation = (b - a).cross(c - a).signum();
        [(a, b), (b, c), (c, a)].iter().all(|&(from, to)| {
            let edge = to - from;
            let length = edge.length();
            length > 1e-6 && orientation * edge.cross(p - from) / length >= -tolerance
        })
    }

    /// The hull of four points is covered by the four triangles through any three of them.
    fn hull_contains(control: &[CanvasPoint; 4], p: CanvasPoint, tolerance: f32) -> bool {
        (0..4).any(|skip| {
            let rest: Vec<CanvasPoint> = (0..4).filter(|&i| i != skip).map(|i| control[i]).collect();
            triangle_contains(rest[0], rest[1], rest[2], p, tolerance)
        })
    }

    #[test]
    fn sizes_and_colors() {
        let polygon = BasePolygon::default();
        let curve = build_catmull_rom(&polygon);
        assert_eq!(curve.control_points.len(), 4 * polygon.len());
        assert_eq!(curve.curve_points.len(), SAMPLES_PER_SEGMENT * polygon.len());
        assert!(curve
            .control_points
            .iter()
            .all(|v| v.color == CurveColor::CatmullRomControl.rgba()));
        assert!(curve
            .curve_points
            .iter()
            .all(|v| v.color == CurveColor::CatmullRomCurve.rgba()));
    }

    #[test]
    fn first_segment_starts_exactly_at_first_vertex() {
        let polygon = BasePolygon::default();
        let curve = build_catmull_rom(&polygon);
        assert_eq!(curve.control_points[0].position, polygon.vertices()[0].position);
        assert_eq!(curve.curve_points[0].position, polygon.vertices()[0].position);
    }

    #[test]
    fn hermite_to_bezier_conversion() {
        let p = default_points();
        let segments = catmull_rom_segments(&p, CATMULL_ROM_TENSION);

        // Edge 9 -> 0 uses vertex 8 behind and vertex 1 ahead
        let s = segments[9];
        assert_eq!(s[0], p[9]);
        assert_eq!(s[3], p[0]);
        assert_abs_diff_eq!(s[1].x, p[9].x + 0.2 * (p[0].x - p[8].x), epsilon = 1e-6);
        assert_abs_diff_eq!(s[1].y, p[9].y + 0.2 * (p[0].y - p[8].y), epsilon = 1e-6);
        assert_abs_diff_eq!(s[2].x, p[0].x - 0.2 * (p[1].x - p[9].x), epsilon = 1e-6);
        assert_abs_diff_eq!(s[2].y, p[0].y - 0.2 * (p[1].y - p[9].y), epsilon = 1e-6);

        // Edge 0 -> 1 wraps backwards to vertex 9
        let s = segments[0];
        assert_abs_diff_eq!(s[1].x, p[0].x + 0.2 * (p[1].x - p[9].x), epsilon = 1e-6);
        assert_abs_diff_eq!(s[2].y, p[1].y - 0.2 * (p[2].y - p[0].y), epsilon = 1e-6);
    }

    #[test]
    fn colinear_polygon_stays_on_its_line() {
        let mut rng = StdRng::seed_from_u64(17);
        let origin = point(0.5, -1.0);
        let direction = euclid::vec2(0.6, 0.8);
        for n in 3..12 {
            let points: Vec<CanvasPoint> = (0..n)
                .map(|_| origin + direction * rng.gen_range(-3.0f32..3.0))
                .collect();
            let polygon = BasePolygon::new(&points).unwrap();
            let curve = build_catmull_rom(&polygon);
            for v in curve.control_points.iter().chain(curve.curve_points.iter()) {
                let offset = v.point() - origin;
                // Distance from the line through `origin` along the unit `direction`
                assert_abs_diff_eq!(offset.cross(direction), 0.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn samples_start_at_c0_and_approach_c3() {
        let control = [point(0.0, 0.0), point(1.0, 3.0), point(4.0, 3.0), point(5.0, 0.0)];
        let samples: Vec<CanvasPoint> = tessellate_segment(&control, SAMPLES_PER_SEGMENT).collect();
        assert_eq!(samples.len(), SAMPLES_PER_SEGMENT);
        assert_eq!(samples[0], control[0]);

        let mut last_distance = std::f32::INFINITY;
        for sample in &samples {
            let distance = (*sample - control[3]).length();
            assert!(distance < last_distance);
            last_distance = distance;
        }
        // u = 14/15 is close to the end
        assert!(last_distance < 1.0);
        let end = de_casteljau(&control, 1.0);
        assert_abs_diff_eq!(end.x, control[3].x, epsilon = 1e-6);
        assert_abs_diff_eq!(end.y, control[3].y, epsilon = 1e-6);
    }

    #[test]
    fn samples_stay_inside_the_control_hull() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            let mut random_point = || -> CanvasPoint { point(rng.gen_range(-4.0..4.0), rng.gen_range(-3.0..3.0)) };
            let control = [random_point(), random_point(), random_point(), random_point()];
            for sample in tessellate_segment(&control, SAMPLES_PER_SEGMENT) {
                assert!(hull_contains(&control, sample, 1e-4));
            }
        }
    }

    #[test]
    fn segments_are_sampled_independently() {
        // Each segment's samples depend only on that segment's control points
        let p = default_points();
        let segments = catmull_rom_segments(&p, CATMULL_ROM_TENSION);
        let polygon = BasePolygon::default();
        let curve = build_catmull_rom(&polygon);
        for (i, segment) in segments.iter().enumerate() {
            for u in 0..SAMPLES_PER_SEGMENT {
                let expected = de_casteljau(segment, u as f32 / SAMPLES_PER_SEGMENT as f32);
                let actual = curve.curve_points[i * SAMPLES_PER_SEGMENT + u].point();
                assert_eq!(actual, expected);
            }
            assert_eq!(curve.curve_points[i * SAMPLES_PER_SEGMENT].point(), p[i]);
        }
    }
}

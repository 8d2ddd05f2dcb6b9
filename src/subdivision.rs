use crate::geometry_utilities::types::CanvasPoint;
use crate::geometry_utilities::{midpoint, CyclicSlice};
use crate::vertex::{CurveColor, Vertex};

/// Number of refinement levels including the unrefined polygon at level 0.
pub const K_MAX: usize = 6;

/// One corner-cutting step over a closed polygon.
///
/// Point `i` of the input produces two output points: the midpoint of the edge
/// arriving at it (`2i`) and a smoothed copy of it (`2i + 1`).
pub fn subdivide(points: &[CanvasPoint]) -> Vec<CanvasPoint> {
    let mut result = Vec::with_capacity(points.len() * 2);
    subdivide_into(points, &mut result);
    result
}

/// Like [`subdivide`] but reuses the allocation of `out`.
pub fn subdivide_into(points: &[CanvasPoint], out: &mut Vec<CanvasPoint>) {
    out.clear();
    if points.is_empty() {
        return;
    }
    let cyclic = CyclicSlice::new(points);
    for i in 0..points.len() {
        let prev = cyclic.neighbour(i, -1).to_vector();
        let current = points[i].to_vector();
        let next = cyclic.neighbour(i, 1).to_vector();
        out.push(midpoint(prev.to_point(), current.to_point()));
        out.push(((prev + current * 6.0 + next) / 8.0).to_point());
    }
}

/// Which refinement level is on display.
///
/// Advancing past `K_MAX - 1` wraps back to 0, the unrefined polygon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubdivisionCounter {
    level: usize,
}

impl SubdivisionCounter {
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn advance(&mut self) -> usize {
        self.level = (self.level + 1) % K_MAX;
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0;
    }
}

/// Storage for every refinement level, reused across frames.
///
/// Level `i` has `N * 2^i` vertices. Only levels up to the requested one are
/// recomputed, anything above keeps whatever it held before.
#[derive(Default)]
pub struct SubdivisionLevels {
    levels: Vec<Vec<CanvasPoint>>,
}

impl SubdivisionLevels {
    pub fn new() -> Self {
        SubdivisionLevels {
            levels: (0..K_MAX).map(|_| Vec::new()).collect(),
        }
    }

    /// Recomputes levels `1..=level` from `base` and returns the points of `level`.
    ///
    /// Levels past the deepest one are clamped to `K_MAX - 1`.
    pub fn refine(&mut self, base: &[CanvasPoint], level: usize) -> &[CanvasPoint] {
        puffin::profile_function!();
        let level = level.min(K_MAX - 1);
        if self.levels.len() < K_MAX {
            self.levels.resize_with(K_MAX, Vec::new);
        }

        self.levels[0].clear();
        self.levels[0].extend_from_slice(base);
        for i in 1..=level {
            let (coarser, finer) = self.levels.split_at_mut(i);
            subdivide_into(&coarser[i - 1], &mut finer[0]);
        }
        &self.levels[level]
    }

    /// Refined points of `level` as displayable vertices.
    pub fn refine_vertices(&mut self, base: &[CanvasPoint], level: usize) -> Vec<Vertex> {
        self.refine(base, level)
            .iter()
            .map(|&p| CurveColor::Subdivision.vertex(p))
            .collect()
    }

    /// Points last computed for `level`, possibly stale.
    pub fn level(&self, level: usize) -> &[CanvasPoint] {
        self.levels.get(level).map(|l| l.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::default_points;
    use approx::assert_abs_diff_eq;
    use euclid::point2 as point;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_polygon(rng: &mut StdRng, n: usize) -> Vec<CanvasPoint> {
        (0..n)
            .map(|_| point(rng.gen_range(-4.0..4.0), rng.gen_range(-3.0..3.0)))
            .collect()
    }

    #[test]
    fn one_step_doubles_the_point_count() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in 3..40 {
            let polygon = random_polygon(&mut rng, n);
            assert_eq!(subdivide(&polygon).len(), 2 * n);
        }
    }

    #[test]
    fn level_sizes() {
        let base = default_points();
        let mut levels = SubdivisionLevels::new();
        for level in 0..K_MAX {
            assert_eq!(levels.refine(&base, level).len(), base.len() << level);
        }
        assert_eq!(levels.level(5).len(), 320);
    }

    #[test]
    fn first_step_of_default_polygon() {
        let p = default_points();
        let q = subdivide(&p);
        assert_eq!(q.len(), 20);

        // Wrap-around at index 0: predecessor is the last point
        assert_abs_diff_eq!(q[0].x, (p[9].x + p[0].x) / 2.0);
        assert_abs_diff_eq!(q[0].y, (p[9].y + p[0].y) / 2.0);
        assert_abs_diff_eq!(q[1].x, (p[9].x + 6.0 * p[0].x + p[1].x) / 8.0);
        assert_abs_diff_eq!(q[1].y, (p[9].y + 6.0 * p[0].y + p[1].y) / 8.0);

        for i in 0..10 {
            let prev = p[(i + 9) % 10];
            let next = p[(i + 1) % 10];
            assert_abs_diff_eq!(q[2 * i].x, (prev.x + p[i].x) / 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(q[2 * i].y, (prev.y + p[i].y) / 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(q[2 * i + 1].x, (prev.x + 6.0 * p[i].x + next.x) / 8.0, epsilon = 1e-6);
            assert_abs_diff_eq!(q[2 * i + 1].y, (prev.y + 6.0 * p[i].y + next.y) / 8.0, epsilon = 1e-6);
        }

        // Concrete values
        assert_abs_diff_eq!(q[0].x, 0.5);
        assert_abs_diff_eq!(q[0].y, 0.25);
        assert_abs_diff_eq!(q[1].x, 0.8125);
        assert_abs_diff_eq!(q[1].y, 0.5625);
    }

    #[test]
    fn subdivision_is_affine_equivariant() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.gen_range(3..16);
            let polygon = random_polygon(&mut rng, n);
            let transform = euclid::Transform2D::<f32, _, _>::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );

            let transformed_first: Vec<CanvasPoint> = polygon.iter().map(|&p| transform.transform_point(p)).collect();
            let a = subdivide(&transformed_first);
            let b: Vec<CanvasPoint> = subdivide(&polygon)
                .iter()
                .map(|&p| transform.transform_point(p))
                .collect();

            for (a, b) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
                assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn counter_wraps_after_k_max_steps() {
        let mut counter = SubdivisionCounter::default();
        let levels: Vec<usize> = (0..K_MAX).map(|_| counter.advance()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5, 0]);
        counter.advance();
        counter.reset();
        assert_eq!(counter.level(), 0);
    }

    #[test]
    fn full_cycle_reproduces_the_base_polygon() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 3..12 {
            let base = random_polygon(&mut rng, n);
            let mut levels = SubdivisionLevels::new();
            let mut counter = SubdivisionCounter::default();
            for _ in 0..K_MAX {
                let level = counter.advance();
                levels.refine(&base, level);
            }
            assert_eq!(counter.level(), 0);
            assert_eq!(levels.refine(&base, counter.level()), base.as_slice());
        }
    }

    #[test]
    fn stale_levels_are_left_alone() {
        let base = default_points();
        let mut levels = SubdivisionLevels::new();
        let deep = levels.refine(&base, 3).to_vec();

        let moved: Vec<CanvasPoint> = base.iter().map(|&p| p + euclid::vec2(1.0, 0.0)).collect();
        levels.refine(&moved, 1);
        assert_eq!(levels.level(3), deep.as_slice());
    }

    #[test]
    fn levels_past_the_deepest_are_clamped() {
        let base = default_points();
        let mut levels = SubdivisionLevels::new();
        let deepest = levels.refine(&base, K_MAX - 1).to_vec();
        let clamped = levels.refine(&base, K_MAX + 3).to_vec();
        assert_eq!(clamped.len(), 320);
        assert_eq!(clamped, deepest);
    }

    #[test]
    fn empty_input() {
        assert!(subdivide(&[]).is_empty());
    }
}

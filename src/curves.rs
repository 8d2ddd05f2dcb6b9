use crate::bezier::build_bezier;
use crate::catmull_rom::build_catmull_rom;
use crate::polygon::BasePolygon;
use crate::subdivision::SubdivisionLevels;
use crate::vertex::Vertex;
use std::fmt;

/// Which derived curve is on display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveMode {
    None,
    Subdivision,
    Bezier,
    CatmullRom,
}

impl Default for CurveMode {
    fn default() -> Self {
        CurveMode::None
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveMode::None => "none",
            CurveMode::Subdivision => "subdivision",
            CurveMode::Bezier => "bezier",
            CurveMode::CatmullRom => "catmull-rom",
        };
        f.write_str(name)
    }
}

/// How a batch of vertices is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawStyle {
    Points,
    LineLoop,
    LineLoopWithPoints,
}

impl DrawStyle {
    pub fn draws_points(self) -> bool {
        matches!(self, DrawStyle::Points | DrawStyle::LineLoopWithPoints)
    }

    pub fn draws_lines(self) -> bool {
        matches!(self, DrawStyle::LineLoop | DrawStyle::LineLoopWithPoints)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub vertices: Vec<Vertex>,
    pub style: DrawStyle,
}

/// Everything derived from the base polygon for one frame, in draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Representation {
    pub batches: Vec<Batch>,
}

impl Representation {
    fn push(&mut self, vertices: Vec<Vertex>, style: DrawStyle) {
        if !vertices.is_empty() {
            self.batches.push(Batch { vertices, style });
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

/// Rebuilds the active representation from scratch every frame.
///
/// The only state kept between frames is the subdivision storage, which is
/// scratch memory and never read before being recomputed.
#[derive(Default)]
pub struct CurveEngine {
    subdivision: SubdivisionLevels,
}

impl CurveEngine {
    pub fn new() -> Self {
        CurveEngine {
            subdivision: SubdivisionLevels::new(),
        }
    }

    pub fn build(&mut self, polygon: &BasePolygon, mode: CurveMode, subdivision_level: usize) -> Representation {
        puffin::profile_function!();
        let mut representation = Representation::default();
        match mode {
            CurveMode::None => {}
            CurveMode::Subdivision => {
                // Level 0 is the base polygon itself, which is always drawn anyway
                if subdivision_level > 0 {
                    let points = polygon.points();
                    representation.push(
                        self.subdivision.refine_vertices(&points, subdivision_level),
                        DrawStyle::Points,
                    );
                }
            }
            CurveMode::Bezier => {
                representation.push(build_bezier(polygon), DrawStyle::LineLoopWithPoints);
            }
            CurveMode::CatmullRom => {
                let curve = build_catmull_rom(polygon);
                representation.push(curve.control_points, DrawStyle::LineLoopWithPoints);
                representation.push(curve.curve_points, DrawStyle::LineLoop);
            }
        }
        representation
    }
}

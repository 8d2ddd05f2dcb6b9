use crate::geometry_utilities::types::CanvasPoint;
use crate::geometry_utilities::CyclicSlice;
use crate::picking::BACKGROUND_ID;
use crate::vertex::{CurveColor, Vertex};
use thiserror::Error;

/// The smallest polygon the curve constructions make sense for.
pub const MIN_VERTICES: usize = 3;
/// Every vertex needs its own picking id and the background id is reserved.
pub const MAX_VERTICES: usize = BACKGROUND_ID as usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolygonError {
    #[error("a control polygon needs at least {} vertices, got {0}", MIN_VERTICES)]
    TooFewVertices(usize),
    #[error("a control polygon can have at most {} pickable vertices, got {0}", MAX_VERTICES)]
    TooManyVertices(usize),
}

/// The user-editable closed control polygon.
///
/// The vertex count is fixed at construction and vertex indices double as picking ids.
/// Only positions can change after construction, colors stay as they were created.
#[derive(Clone, Debug, PartialEq)]
pub struct BasePolygon {
    vertices: Vec<Vertex>,
}

impl BasePolygon {
    pub fn new(points: &[CanvasPoint]) -> Result<BasePolygon, PolygonError> {
        if points.len() < MIN_VERTICES {
            return Err(PolygonError::TooFewVertices(points.len()));
        }
        if points.len() > MAX_VERTICES {
            return Err(PolygonError::TooManyVertices(points.len()));
        }
        Ok(BasePolygon {
            vertices: points.iter().map(|&p| CurveColor::Polygon.vertex(p)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn points(&self) -> Vec<CanvasPoint> {
        self.vertices.iter().map(Vertex::point).collect()
    }

    pub fn cyclic(&self) -> CyclicSlice<'_, Vertex> {
        CyclicSlice::new(&self.vertices)
    }

    /// Moves vertex `index` to `point`. Returns false and changes nothing if the index is out of range.
    pub fn move_vertex(&mut self, index: usize, point: CanvasPoint) -> bool {
        match self.vertices.get_mut(index) {
            Some(vertex) => {
                vertex.set_point(point);
                true
            }
            None => false,
        }
    }
}

impl Default for BasePolygon {
    /// The ten point figure-eight the editor starts with.
    fn default() -> Self {
        BasePolygon {
            vertices: default_points().iter().map(|&p| CurveColor::Polygon.vertex(p)).collect(),
        }
    }
}

pub fn default_points() -> [CanvasPoint; 10] {
    [
        CanvasPoint::new(1.0, 0.5),
        CanvasPoint::new(0.5, 1.5),
        CanvasPoint::new(-0.5, 1.5),
        CanvasPoint::new(-1.0, 0.5),
        CanvasPoint::new(0.0, 0.0),
        CanvasPoint::new(1.0, -0.5),
        CanvasPoint::new(0.5, -1.5),
        CanvasPoint::new(-0.5, -1.5),
        CanvasPoint::new(-1.0, -0.5),
        CanvasPoint::new(0.0, 0.0),
    ]
}

use crate::geometry_utilities::types::CanvasPoint;
use palette::{Pixel, Srgba};

pub trait GPUVertex {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a>;

    /// Same layout, but advanced once per instance instead of once per vertex.
    fn instance_desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            step_mode: wgpu::VertexStepMode::Instance,
            ..Self::desc()
        }
    }
}

/// A point of any curve representation, laid out exactly as the shaders read it.
///
/// Only `x` and `y` carry geometry. `z` is kept at 0 and `w` at 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(point: CanvasPoint, color: [f32; 4]) -> Vertex {
        Vertex {
            position: [point.x, point.y, 0.0, 1.0],
            color,
        }
    }

    pub fn point(&self) -> CanvasPoint {
        CanvasPoint::new(self.position[0], self.position[1])
    }

    /// Moves the vertex in the plane. `z` and `w` are left as they are.
    pub fn set_point(&mut self, point: CanvasPoint) {
        self.position[0] = point.x;
        self.position[1] = point.y;
    }
}

impl GPUVertex for Vertex {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Display color of each representation. Colors carry no meaning beyond display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveColor {
    Polygon,
    Subdivision,
    Bezier,
    CatmullRomControl,
    CatmullRomCurve,
}

impl CurveColor {
    pub fn srgba(self) -> Srgba {
        match self {
            CurveColor::Polygon => Srgba::new(1.0, 1.0, 1.0, 1.0),
            CurveColor::Subdivision => Srgba::new(0.0, 1.0, 1.0, 1.0),
            CurveColor::Bezier => Srgba::new(1.0, 1.0, 0.0, 1.0),
            CurveColor::CatmullRomControl => Srgba::new(1.0, 0.0, 0.0, 1.0),
            CurveColor::CatmullRomCurve => Srgba::new(0.0, 1.0, 0.0, 1.0),
        }
    }

    pub fn rgba(self) -> [f32; 4] {
        self.srgba().into_raw()
    }

    pub fn vertex(self, point: CanvasPoint) -> Vertex {
        Vertex::new(point, self.rgba())
    }
}

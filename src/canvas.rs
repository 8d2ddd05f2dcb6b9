use crate::config::{Projection, CAMERA_EYE, CAMERA_TARGET, CAMERA_UP, PROJECTION};
use crate::geometry_utilities::types::*;
use cgmath::{Matrix4, Point3, SquareMatrix, Vector3, Vector4};
use winit::dpi::PhysicalSize;

/// Maps OpenGL clip space depth (-1..1) to the 0..1 range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Fixed orthographic camera over the canvas plane, stretched over whatever the window size is.
///
/// The camera looks from negative Z towards the origin, so canvas X grows to the left on screen.
#[derive(Copy, Clone, Debug)]
pub struct CanvasView {
    pub resolution: PhysicalSize<u32>,
    view_proj: Matrix4<f32>,
    inverse_view_proj: Matrix4<f32>,
}

impl CanvasView {
    pub fn new(resolution: PhysicalSize<u32>) -> CanvasView {
        let view_proj = Self::projection(&PROJECTION) * Self::view();
        CanvasView {
            resolution,
            view_proj,
            // The camera is never degenerate, but fall back to identity rather than panic
            inverse_view_proj: view_proj.invert().unwrap_or_else(Matrix4::identity),
        }
    }

    pub fn projection(bounds: &Projection) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * cgmath::ortho(
                bounds.left,
                bounds.right,
                bounds.bottom,
                bounds.top,
                bounds.near,
                bounds.far,
            )
    }

    pub fn view() -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from(CAMERA_EYE),
            Point3::from(CAMERA_TARGET),
            Vector3::from(CAMERA_UP),
        )
    }

    pub fn resize(&mut self, resolution: PhysicalSize<u32>) {
        self.resolution = resolution;
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.view_proj
    }

    /// Column major, as the shaders read it.
    pub fn view_proj_uniform(&self) -> [[f32; 4]; 4] {
        self.view_proj.into()
    }

    pub fn viewport(&self) -> [f32; 2] {
        [self.resolution.width as f32, self.resolution.height as f32]
    }

    pub fn screen_to_canvas_point(&self, point: ScreenPoint) -> CanvasPoint {
        let [width, height] = self.viewport();
        let ndc = Vector4::new(
            2.0 * point.x / width.max(1.0) - 1.0,
            1.0 - 2.0 * point.y / height.max(1.0),
            0.0,
            1.0,
        );
        let world = self.inverse_view_proj * ndc;
        CanvasPoint::new(world.x / world.w, world.y / world.w)
    }

    pub fn canvas_to_screen_point(&self, point: CanvasPoint) -> ScreenPoint {
        let [width, height] = self.viewport();
        let clip = self.view_proj * Vector4::new(point.x, point.y, 0.0, 1.0);
        let (x, y) = (clip.x / clip.w, clip.y / clip.w);
        ScreenPoint::new((x + 1.0) * 0.5 * width, (1.0 - y) * 0.5 * height)
    }

    /// The framebuffer pixel under a cursor position, if it lies inside the window.
    pub fn pixel_at(&self, point: ScreenPoint) -> Option<(u32, u32)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let (x, y) = (point.x.floor() as u32, point.y.floor() as u32);
        if x < self.resolution.width && y < self.resolution.height {
            Some((x, y))
        } else {
            None
        }
    }
}

use std::time::Duration;

pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 768;
pub const WINDOW_TITLE: &str = "Polycurve";

/// Used when the surface does not report a preferred format.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;
/// Linear 8-bit storage so that picking ids are read back exactly.
pub const PICKING_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 1.0,
};
pub const PICKING_CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Orthographic bounds in canvas units.
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

pub const PROJECTION: Projection = Projection {
    left: -4.0,
    right: 4.0,
    bottom: -3.0,
    top: 3.0,
    near: 0.0,
    far: 100.0,
};

pub const CAMERA_EYE: [f32; 3] = [0.0, 0.0, -5.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Side length of a vertex marker in physical pixels.
pub const POINT_SIZE: f32 = 10.0;

pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(1_000_000 / 60);
/// How often the frame time is reported.
pub const FRAME_REPORT_INTERVAL: Duration = Duration::from_secs(1);

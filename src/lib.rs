pub mod app;
pub mod bezier;
pub mod canvas;
pub mod catmull_rom;
pub mod config;
pub mod curves;
pub mod editor;
pub mod egui_wrapper;
pub mod fps_limiter;
pub mod geometry_utilities;
pub mod input;
pub mod picking;
pub mod polygon;
pub mod renderer;
pub mod shader;
pub mod subdivision;
pub mod vertex;
pub mod wgpu_utils;

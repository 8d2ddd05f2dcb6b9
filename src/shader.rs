use crate::wgpu_utils::capture_validation_error;
use std::borrow::Cow;
use wgpu::{Device, ShaderModule};

pub const CURVE_SHADER: &str = include_str!("../shaders/curve.wgsl");
pub const PICKING_SHADER: &str = include_str!("../shaders/picking.wgsl");

/// Compiles a WGSL shader. Validation failures are returned instead of aborting the process.
pub fn load_shader(device: &Device, label: &str, source: &str) -> Result<ShaderModule, String> {
    let (module, error) = capture_validation_error(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
        })
    });
    match error {
        Some(error) => Err(format!("shader '{}' failed to compile: {}", label, error)),
        None => Ok(module),
    }
}

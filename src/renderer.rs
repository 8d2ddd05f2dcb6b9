use crate::canvas::CanvasView;
use crate::config::{CLEAR_COLOR, PICKING_CLEAR_COLOR, PICKING_FORMAT, POINT_SIZE, TEXTURE_FORMAT};
use crate::curves::{DrawStyle, Representation};
use crate::geometry_utilities::types::ScreenPoint;
use crate::picking::{encode_id, id_colors, PickResult, BACKGROUND_ID};
use crate::polygon::{BasePolygon, MAX_VERTICES};
use crate::shader::{load_shader, CURVE_SHADER, PICKING_SHADER};
use crate::vertex::{GPUVertex, Vertex};
use crate::wgpu_utils::{capture_validation_error, create_buffer, log_validation_errors, DynamicBuffer};
use futures::executor::block_on;
use log::{debug, info, warn};
use std::num::NonZeroU32;
use thiserror::Error;
use wgpu::{BindGroup, BindGroupLayout, Buffer, BufferUsages, Device, Queue, RenderPipeline, ShaderModule};
use winit::dpi::PhysicalSize;
use winit::window::Window;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("could not open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("could not acquire the next frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("{0}")]
    Pipeline(String),
    #[error("could not read back the picking buffer: {0}")]
    Readback(String),
}

/// Uniform data shared by every pipeline. Must match `Globals` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _pad: f32,
}

impl Globals {
    pub fn new(view: &CanvasView) -> Globals {
        Globals {
            view_proj: view.view_proj_uniform(),
            viewport: view.viewport(),
            point_size: POINT_SIZE,
            _pad: 0.0,
        }
    }
}

/// Vertices to upload for a closed loop: the first vertex is repeated at the end.
///
/// Drawn as a line strip this closes the loop. Drawn as point instances only the
/// first `vertices.len()` entries are used.
pub fn closed_loop(vertices: &[Vertex]) -> Vec<Vertex> {
    let mut result = Vec::with_capacity(vertices.len() + 1);
    result.extend_from_slice(vertices);
    if let Some(&first) = vertices.first() {
        result.push(first);
    }
    result
}

/// Window surface and the device that draws into it.
pub struct GpuContext {
    pub surface: wgpu::Surface,
    pub device: Device,
    pub queue: Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    pub fn new(window: &Window) -> Result<GpuContext, RenderError> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(RenderError::NoAdapter)?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .unwrap_or(TEXTURE_FORMAT);
        let alpha_mode = surface
            .get_supported_alpha_modes(&adapter)
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Opaque);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
        };
        surface.configure(&device, &config);

        Ok(GpuContext {
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        // A minimized window reports a zero size, keep the old configuration until it comes back
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// The next frame to draw into, or `None` if this frame should be skipped.
    pub fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out waiting for the next frame");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

struct GpuBatch {
    vertices: DynamicBuffer,
    count: u32,
    style: DrawStyle,
}

struct PickingTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl PickingTarget {
    fn new(device: &Device, size: PhysicalSize<u32>) -> PickingTarget {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Picking target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICKING_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        PickingTarget { texture, view, size }
    }
}

fn create_pipeline(
    device: &Device,
    label: &str,
    bind_group_layout: &BindGroupLayout,
    module: &ShaderModule,
    vertex_entry: &str,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
) -> RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: vertex_entry,
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Draws the editor contents and answers picking queries.
pub struct Renderer {
    globals: Buffer,
    display_bind_group: BindGroup,
    picking_bind_group: BindGroup,
    point_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    picking_pipeline: RenderPipeline,
    polygon: DynamicBuffer,
    polygon_count: u32,
    batches: Vec<GpuBatch>,
    active_batches: usize,
    picking_target: PickingTarget,
    readback: Buffer,
}

impl Renderer {
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat, view: &CanvasView) -> Result<Renderer, RenderError> {
        let curve_shader = load_shader(device, "Curve shader", CURVE_SHADER).map_err(RenderError::Pipeline)?;
        let picking_shader = load_shader(device, "Picking shader", PICKING_SHADER).map_err(RenderError::Pipeline)?;

        let (globals, _) = create_buffer(
            device,
            &[Globals::new(view)],
            BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            Some("Globals UBO"),
        );

        // One entry per possible id so the shader can index with any instance
        let mut id_table = id_colors(MAX_VERTICES);
        id_table.push(encode_id(BACKGROUND_ID));
        let (picking_ids, _) = create_buffer(device, &id_table, BufferUsages::UNIFORM, Some("Picking ids UBO"));

        let display_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Display bind group layout"),
            entries: &[uniform_entry(0)],
        });
        let picking_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Picking bind group layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let display_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Display bind group"),
            layout: &display_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });
        let picking_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Picking bind group"),
            layout: &picking_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: picking_ids.as_entire_binding(),
                },
            ],
        });

        let ((point_pipeline, line_pipeline, picking_pipeline), error) = capture_validation_error(device, || {
            (
                create_pipeline(
                    device,
                    "Point pipeline",
                    &display_layout,
                    &curve_shader,
                    "vs_point",
                    Vertex::instance_desc(),
                    wgpu::PrimitiveTopology::TriangleList,
                    surface_format,
                ),
                create_pipeline(
                    device,
                    "Line pipeline",
                    &display_layout,
                    &curve_shader,
                    "vs_line",
                    Vertex::desc(),
                    wgpu::PrimitiveTopology::LineStrip,
                    surface_format,
                ),
                create_pipeline(
                    device,
                    "Picking pipeline",
                    &picking_layout,
                    &picking_shader,
                    "vs_main",
                    Vertex::instance_desc(),
                    wgpu::PrimitiveTopology::TriangleList,
                    PICKING_FORMAT,
                ),
            )
        });
        if let Some(error) = error {
            return Err(RenderError::Pipeline(error.to_string()));
        }

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking readback"),
            size: wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64,
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Renderer {
            globals,
            display_bind_group,
            picking_bind_group,
            point_pipeline,
            line_pipeline,
            picking_pipeline,
            polygon: DynamicBuffer::new(device, BufferUsages::VERTEX, "Polygon VBO"),
            polygon_count: 0,
            batches: Vec::new(),
            active_batches: 0,
            picking_target: PickingTarget::new(device, view.resolution),
            readback,
        })
    }

    /// Uploads this frame's geometry. Upload errors are logged and the frame goes on.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        polygon: &BasePolygon,
        representation: &Representation,
        view: &CanvasView,
    ) {
        puffin::profile_function!();
        log_validation_errors(device, "Uploading curve buffers", || {
            queue.write_buffer(&self.globals, 0, crate::wgpu_utils::as_u8_slice(&[Globals::new(view)]));
            self.polygon.upload(device, queue, polygon.vertices());
            self.polygon_count = polygon.len() as u32;

            while self.batches.len() < representation.batches.len() {
                self.batches.push(GpuBatch {
                    vertices: DynamicBuffer::new(device, BufferUsages::VERTEX, "Curve VBO"),
                    count: 0,
                    style: DrawStyle::Points,
                });
            }
            for (gpu, batch) in self.batches.iter_mut().zip(representation.batches.iter()) {
                gpu.vertices.upload(device, queue, &closed_loop(&batch.vertices));
                gpu.count = batch.vertices.len() as u32;
                gpu.style = batch.style;
            }
            self.active_batches = representation.batches.len();
        });
    }

    /// Draws everything uploaded by the last [`Renderer::prepare`] into `target`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        puffin::profile_function!();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Curve pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });
        pass.set_bind_group(0, &self.display_bind_group, &[]);

        for batch in &self.batches[..self.active_batches] {
            if batch.vertices.is_empty() {
                continue;
            }
            if batch.style.draws_lines() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, batch.vertices.slice());
                pass.draw(0..batch.count + 1, 0..1);
            }
            if batch.style.draws_points() {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_vertex_buffer(0, batch.vertices.slice());
                pass.draw(0..6, 0..batch.count);
            }
        }

        // The base polygon goes on top of everything
        if !self.polygon.is_empty() {
            pass.set_pipeline(&self.point_pipeline);
            pass.set_vertex_buffer(0, self.polygon.slice());
            pass.draw(0..6, 0..self.polygon_count);
        }
    }

    /// Renders the base polygon with id colors and reads back the pixel under `cursor`.
    ///
    /// Blocks until the GPU has finished.
    pub fn pick(
        &mut self,
        device: &Device,
        queue: &Queue,
        polygon: &BasePolygon,
        view: &CanvasView,
        cursor: ScreenPoint,
    ) -> Result<PickResult, RenderError> {
        puffin::profile_function!();
        let (x, y) = match view.pixel_at(cursor) {
            Some(pixel) => pixel,
            None => {
                warn!("Cursor at {:?} is outside the framebuffer", cursor);
                return Ok(PickResult::Background);
            }
        };

        if self.picking_target.size != view.resolution {
            self.picking_target = PickingTarget::new(device, view.resolution);
        }

        queue.write_buffer(&self.globals, 0, crate::wgpu_utils::as_u8_slice(&[Globals::new(view)]));
        self.polygon.upload(device, queue, polygon.vertices());
        self.polygon_count = polygon.len() as u32;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Picking encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Picking pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.picking_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(PICKING_CLEAR_COLOR),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            pass.set_pipeline(&self.picking_pipeline);
            pass.set_bind_group(0, &self.picking_bind_group, &[]);
            pass.set_vertex_buffer(0, self.polygon.slice());
            pass.draw(0..6, 0..self.polygon_count);
        }

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.picking_target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: NonZeroU32::new(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = self.readback.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        // Mapping only completes once the device has been polled
        device.poll(wgpu::Maintain::Wait);
        block_on(receiver)
            .map_err(|_| RenderError::Readback("mapping was cancelled".to_owned()))?
            .map_err(|err| RenderError::Readback(format!("{:?}", err)))?;

        let pixel = {
            let data = slice.get_mapped_range();
            [data[0], data[1], data[2], data[3]]
        };
        self.readback.unmap();

        let result = PickResult::from_pixel(pixel);
        debug!("Pixel ({}, {}) = {:?} -> {}", x, y, pixel, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::CurveColor;
    use euclid::point2 as point;

    #[test]
    fn globals_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 80);
    }

    #[test]
    fn closed_loop_repeats_the_first_vertex() {
        let vertices: Vec<Vertex> = (0..4)
            .map(|i| CurveColor::Bezier.vertex(point(i as f32, 0.0)))
            .collect();
        let closed = closed_loop(&vertices);
        assert_eq!(closed.len(), 5);
        assert_eq!(closed[4], vertices[0]);
        assert!(closed_loop(&[]).is_empty());
    }

    #[test]
    fn error_messages() {
        assert_eq!(RenderError::NoAdapter.to_string(), "no compatible graphics adapter found");
        assert_eq!(
            RenderError::Readback("timeout".to_owned()).to_string(),
            "could not read back the picking buffer: timeout"
        );
    }
}

use egui::ClippedPrimitive;
use egui_wgpu_backend::ScreenDescriptor;
use log::error;
use std::time::Instant;
use wgpu::Device;
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::window::Window;

/// What the overlay shows. Pure data, the overlay never writes back.
pub struct StatusLines<'a> {
    pub last_picked: &'a str,
    pub mode: String,
    pub subdivision_level: usize,
}

impl<'a> StatusLines<'a> {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Last picked object: {}", self.last_picked),
            format!("Curve: {}", self.mode),
            format!("Subdivision level: {}", self.subdivision_level),
        ]
    }
}

pub struct EguiWrapper {
    pub platform: egui_winit_platform::Platform,
    egui_render_pass: egui_wgpu_backend::RenderPass,
    start_time: Instant,
}

impl EguiWrapper {
    pub fn new(device: &Device, format: wgpu::TextureFormat, size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let platform = egui_winit_platform::Platform::new(egui_winit_platform::PlatformDescriptor {
            physical_width: size.width,
            physical_height: size.height,
            scale_factor,
            font_definitions: egui::FontDefinitions::default(),
            style: Default::default(),
        });

        let egui_render_pass = egui_wgpu_backend::RenderPass::new(device, format, 1);

        Self {
            platform,
            egui_render_pass,
            start_time: Instant::now(),
        }
    }

    pub fn handle_event(&mut self, event: &Event<'_, ()>) {
        self.platform.handle_event(event);
    }

    /// Whether egui wants the pointer, in which case clicks should not reach the canvas.
    pub fn wants_pointer(&self) -> bool {
        self.platform.context().wants_pointer_input()
    }

    /// Lays out the status panel and returns the tessellated result.
    pub fn frame(&mut self, window: &Window, status: &StatusLines<'_>) -> (Vec<ClippedPrimitive>, egui::TexturesDelta) {
        puffin::profile_function!();
        self.platform.update_time(self.start_time.elapsed().as_secs_f64());
        self.platform.begin_frame();

        let ctx = self.platform.context();
        egui::Window::new("Status")
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
            .show(&ctx, |ui| {
                for line in status.lines().iter() {
                    ui.label(line);
                }
                ui.separator();
                ui.label("1: subdivide  2: bezier  3: catmull-rom  Esc: quit");
            });

        let output = self.platform.end_frame(Some(window));
        (ctx.tessellate(output.shapes), output.textures_delta)
    }

    /// Draws the overlay on top of `view`. Failures are logged, the frame is kept.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        paint_jobs: &[ClippedPrimitive],
        textures_delta: egui::TexturesDelta,
        device: &Device,
        view: &wgpu::TextureView,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        screen_descriptor: &ScreenDescriptor,
    ) {
        puffin::profile_function!();
        if let Err(err) = self.egui_render_pass.add_textures(device, queue, &textures_delta) {
            error!("Uploading overlay textures: {}", err);
        }
        self.egui_render_pass
            .update_buffers(device, queue, paint_jobs, screen_descriptor);

        if let Err(err) = self
            .egui_render_pass
            .execute(encoder, view, paint_jobs, screen_descriptor, None)
        {
            error!("Drawing the overlay: {}", err);
        }

        if let Err(err) = self.egui_render_pass.remove_textures(textures_delta) {
            error!("Freeing overlay textures: {}", err);
        }
    }
}

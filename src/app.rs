use crate::canvas::CanvasView;
use crate::config::{FRAME_REPORT_INTERVAL, TARGET_FRAME_TIME, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::curves::CurveEngine;
use crate::editor::{CurveKey, EditorState};
use crate::egui_wrapper::{EguiWrapper, StatusLines};
use crate::fps_limiter::{FPSLimiter, FrameTimer};
use crate::input::{CapturedClick, InputManager, MouseButton, VirtualKeyCode};
use crate::renderer::{GpuContext, RenderError, Renderer};
use anyhow::Context;
use log::{error, info};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

const CURVE_KEYS: [(VirtualKeyCode, CurveKey); 3] = [
    (VirtualKeyCode::Key1, CurveKey::Subdivision),
    (VirtualKeyCode::Key2, CurveKey::Bezier),
    (VirtualKeyCode::Key3, CurveKey::CatmullRom),
];

struct App {
    gpu: GpuContext,
    view: CanvasView,
    renderer: Renderer,
    overlay: EguiWrapper,
    editor: EditorState,
    engine: CurveEngine,
    input: InputManager,
    drag: Option<CapturedClick>,
    fps_limiter: FPSLimiter,
    frame_timer: FrameTimer,
}

impl App {
    fn new(window: &Window) -> anyhow::Result<App> {
        let gpu = GpuContext::new(window).context("Initializing the graphics device")?;
        let view = CanvasView::new(window.inner_size());
        let renderer = Renderer::new(&gpu.device, gpu.config.format, &view).context("Creating render pipelines")?;
        let overlay = EguiWrapper::new(&gpu.device, gpu.config.format, window.inner_size(), window.scale_factor());

        Ok(App {
            gpu,
            view,
            renderer,
            overlay,
            editor: EditorState::default(),
            engine: CurveEngine::new(),
            input: InputManager::new(),
            drag: None,
            fps_limiter: FPSLimiter::default(),
            frame_timer: FrameTimer::new(FRAME_REPORT_INTERVAL),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
        if size.width > 0 && size.height > 0 {
            self.view.resize(size);
        }
    }

    /// Applies this frame's input to the editor. Returns false when the user asked to quit.
    fn update(&mut self) -> bool {
        if self.input.on_down(VirtualKeyCode::Escape) {
            return false;
        }

        for &(key, curve) in CURVE_KEYS.iter() {
            if self.input.on_up(key) {
                self.editor.press_curve_key(curve);
            }
        }

        if !self.overlay.wants_pointer() {
            if let Some(click) = self.input.capture_click(MouseButton::Left) {
                match self.renderer.pick(
                    &self.gpu.device,
                    &self.gpu.queue,
                    self.editor.polygon(),
                    &self.view,
                    click.mouse_start,
                ) {
                    Ok(result) => {
                        self.editor.resolve_pick(result);
                        self.drag = Some(click);
                    }
                    Err(err) => {
                        error!("Picking failed: {}", err);
                        self.editor.clear_selection();
                        self.drag = None;
                    }
                }
            }
        }

        match self.drag.as_ref().map(|click| click.is_held(&self.input)) {
            Some(true) => {
                let target = self.view.screen_to_canvas_point(self.input.mouse_position);
                self.editor.drag_to(target);
            }
            Some(false) => self.drag = None,
            None => {}
        }
        true
    }

    fn draw(&mut self, window: &Window) -> Result<(), RenderError> {
        puffin::profile_function!();
        let representation = self.editor.representation(&mut self.engine);
        self.renderer.prepare(
            &self.gpu.device,
            &self.gpu.queue,
            self.editor.polygon(),
            &representation,
            &self.view,
        );

        let frame = match self.gpu.acquire_frame()? {
            Some(frame) => frame,
            None => return Ok(()),
        };
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame encoder"),
        });

        self.renderer.render(&mut encoder, &target);

        let status = StatusLines {
            last_picked: self.editor.status(),
            mode: self.editor.mode().to_string(),
            subdivision_level: self.editor.subdivision_level(),
        };
        let (paint_jobs, textures_delta) = self.overlay.frame(window, &status);
        let screen_descriptor = egui_wgpu_backend::ScreenDescriptor {
            physical_width: self.gpu.config.width,
            physical_height: self.gpu.config.height,
            scale_factor: window.scale_factor() as f32,
        };
        self.overlay.render(
            &paint_jobs,
            textures_delta,
            &self.gpu.device,
            &target,
            &self.gpu.queue,
            &mut encoder,
            &screen_descriptor,
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// One full iteration of the main loop. Returns false when the loop should stop.
    fn frame(&mut self, window: &Window) -> bool {
        puffin::GlobalProfiler::lock().new_frame();
        if !self.update() {
            return false;
        }
        if let Err(err) = self.draw(window) {
            error!("{}", err);
            return false;
        }
        self.frame_timer.tick();
        self.input.tick_frame();
        self.fps_limiter.wait(TARGET_FRAME_TIME);
        true
    }
}

/// Opens the editor window and runs until it is closed.
pub fn run() -> anyhow::Result<()> {
    info!("Controls:");
    info!("  left mouse: pick and drag a polygon vertex");
    info!("  1: subdivision (press again for the next level)");
    info!("  2: bezier curve");
    info!("  3: catmull-rom spline");
    info!("  escape: quit");

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .context("Creating the window")?;

    let mut app = App::new(&window)?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        app.overlay.handle_event(&event);
        app.input.event(&event);

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => app.resize(*size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => app.resize(**new_inner_size),
                _ => {}
            },
            Event::MainEventsCleared => window.request_redraw(),
            Event::RedrawRequested(_) => {
                if !app.frame(&window) {
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}

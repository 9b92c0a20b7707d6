mod ui;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use folio_assets::{ResourceLoader, default_manifest, fetcher_for, load_manifest};
use folio_common::{Color, Viewport};
use folio_input::{PageEvent, WheelScroller};
use folio_render::Renderer;
use folio_render_wgpu::WgpuRenderer;
use folio_scene::{Camera, Scene};
use folio_tools::FrameTimer;
use folio_world::{Experience, ExperienceSettings, LoadStatus};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Theme, Window, WindowId};

/// Page sections the wheel can scroll through.
const SECTIONS: u32 = 3;

#[derive(Parser)]
#[command(name = "folio-desktop", about = "Portfolio scene in a desktop window")]
struct Cli {
    /// Asset manifest (JSON or YAML). The site's own list is used when omitted.
    #[arg(long)]
    manifest: Option<String>,

    /// Directory or http(s) URL the manifest paths are relative to
    #[arg(long, default_value = "./static")]
    asset_base: String,

    /// Debug camera, inspector panels and frame statistics
    #[arg(long)]
    debug: bool,

    /// Start in the dark theme
    #[arg(long)]
    dark: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Hands the active camera back to the host, which draws with wgpu itself.
struct CameraCapture;

impl Renderer for CameraCapture {
    type Output = Camera;

    fn render(&self, _scene: &Scene, camera: &Camera, _viewport: Viewport) -> Camera {
        *camera
    }
}

/// Everything that is not GPU state: the experience and the page chrome.
pub(crate) struct Page {
    experience: Experience<CameraCapture>,
    wheel: WheelScroller,
    timer: FrameTimer,
    started: Instant,
    last_frame: Instant,
    cursor: [f32; 2],
    orbiting: bool,
    debug: bool,
    show_inspector: bool,
    title: String,
}

impl Page {
    fn new(cli: &Cli) -> Result<Self> {
        let sources = match &cli.manifest {
            Some(path) => load_manifest(path).with_context(|| format!("reading manifest {path}"))?,
            None => default_manifest(),
        };
        let fetcher = fetcher_for(&cli.asset_base).context("asset base")?;
        let viewport = Viewport::new(1280.0, 720.0, 1.0);
        let settings = ExperienceSettings {
            debug: cli.debug,
            prefers_dark: cli.dark,
            ..ExperienceSettings::default()
        };
        let mut experience = Experience::new(ResourceLoader::new(fetcher), CameraCapture, viewport, settings);
        experience.load(sources)?;

        let now = Instant::now();
        Ok(Self {
            experience,
            wheel: WheelScroller::new(viewport.height, SECTIONS),
            timer: FrameTimer::default(),
            started: now,
            last_frame: now,
            cursor: [0.0, 0.0],
            orbiting: false,
            debug: cli.debug,
            show_inspector: cli.debug,
            title: String::new(),
        })
    }

    /// Advance one frame and return the camera to draw with.
    fn frame(&mut self) -> Option<Camera> {
        let now = Instant::now();
        self.timer.record(now - self.last_frame);
        self.last_frame = now;
        match self.experience.tick(now - self.started) {
            Ok(camera) => camera,
            Err(e) => {
                tracing::error!(error = %e, "scene configuration error; continuing without the world");
                Some(*self.experience.camera_rig().active())
            }
        }
    }

    fn background(&self) -> Color {
        let pair = self.experience.settings().palette.secondary;
        if self.experience.theme().is_dark() { pair.dark } else { pair.light }
    }

    fn window_title(&self) -> String {
        match self.experience.status() {
            LoadStatus::Idle | LoadStatus::Ready => "folio".to_string(),
            LoadStatus::Loading { loaded, total } => format!("folio (loading {loaded}/{total})"),
            LoadStatus::Failed(_) => "folio (scene unavailable)".to_string(),
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.experience.handle_event(PageEvent::Resized {
            width: viewport.width,
            height: viewport.height,
            pixel_ratio: viewport.pixel_ratio,
        });
        if let Some(event) = self.wheel.set_viewport_height(viewport.height) {
            self.experience.handle_event(event);
        }
    }

    fn scroll(&mut self, event: Option<PageEvent>) {
        if let Some(event) = event {
            self.experience.handle_event(event);
        }
    }

    fn toggle_theme(&mut self) {
        self.experience.handle_event(PageEvent::ThemeToggled);
    }

    fn switch_camera(&mut self) {
        if !self.experience.camera_rig_mut().switch_camera() {
            tracing::debug!("no debug camera; start with --debug");
        }
    }

    fn debug_camera_active(&self) -> bool {
        self.experience.camera_rig().is_debug_active()
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyT => self.toggle_theme(),
            KeyCode::KeyC => self.switch_camera(),
            KeyCode::F1 => self.show_inspector = !self.show_inspector,
            _ => {}
        }
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta, scale_factor: f64) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => (p.y / scale_factor) as f32 / self.wheel.line_height,
        };
        if self.debug_camera_active() {
            if let Some(orbit) = self.experience.camera_rig_mut().orbit_controls_mut() {
                orbit.zoom(lines);
            }
            return;
        }
        let event = self.wheel.scroll_lines(lines);
        self.scroll(event);
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        let [px, py] = self.cursor;
        self.cursor = [x, y];
        if self.orbiting {
            let height = self.experience.viewport().height;
            if let Some(orbit) = self.experience.camera_rig_mut().orbit_controls_mut() {
                orbit.rotate(Vec2::new(x - px, y - py), height);
            }
        }
        self.experience.handle_event(PageEvent::PointerMoved { x, y });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("folio")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("folio_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(backend = adapter.get_info().backend.to_str(), "GPU initialized");
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn viewport(&self) -> Viewport {
        let scale = self.window.scale_factor();
        let logical = self.window.inner_size().to_logical::<f32>(scale);
        Viewport::new(logical.width, logical.height, scale as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&mut self, page: &mut Page, egui_ctx: &EguiContext, camera: &Camera) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.set_clear_color(page.background());
        self.renderer
            .render(&self.device, &self.queue, &view, page.experience.scene(), camera);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| page.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, delta);
        }
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.egui_renderer
            .update_buffers(&self.device, &self.queue, &mut encoder, &paint_jobs, &screen);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        output.present();

        let title = page.window_title();
        if title != page.title {
            self.window.set_title(&title);
            page.title = title;
        }
    }
}

struct App {
    page: Page,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.page.resize(gpu.viewport());
                if let Some(theme) = gpu.window.theme() {
                    self.page.experience.handle_event(PageEvent::ColorSchemeChanged {
                        prefers_dark: theme == Theme::Dark,
                    });
                }
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!(error = %e, "could not open a window");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        let page = &mut self.page;
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                page.resize(gpu.viewport());
            }
            WindowEvent::ScaleFactorChanged { .. } => page.resize(gpu.viewport()),
            WindowEvent::Occluded(occluded) => {
                page.experience
                    .handle_event(PageEvent::VisibilityChanged { visible: !occluded });
            }
            WindowEvent::ThemeChanged(theme) => {
                page.experience.handle_event(PageEvent::ColorSchemeChanged {
                    prefers_dark: theme == Theme::Dark,
                });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => page.handle_key(key),
            WindowEvent::MouseWheel { delta, .. } => page.handle_wheel(delta, gpu.window.scale_factor()),
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(gpu.window.scale_factor());
                page.handle_cursor(logical.x, logical.y);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => page.experience.handle_event(PageEvent::PointerClicked),
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => page.orbiting = state == ElementState::Pressed && page.debug_camera_active(),
            WindowEvent::RedrawRequested => {
                if let Some(camera) = page.frame() {
                    gpu.draw(page, &self.egui_ctx, &camera);
                }
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(asset_base = %cli.asset_base, debug = cli.debug, "folio-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        page: Page::new(&cli)?,
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}

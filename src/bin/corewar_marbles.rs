//! Corewar Marbles
//!
//! Replays a Corewar VM log as a 3D marble race.
//!
//! Run with: cargo run --release -- <log-file>
//!
//! Controls:
//! - Mouse: look around (click to recapture the cursor)
//! - W/S, A/D: fly forward/back, strafe
//! - Q/E: fly up/down
//! - Shift: sprint
//! - P: replay faster (halve the time per line)
//! - O: replay slower (double the time per line)
//! - ESC: exit

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use corewar_marbles_engine::camera::FPSCameraController;
use corewar_marbles_engine::game::{
    LogFileError, LogReader, PresetSource, RaceConfig, RaceDriver, RaceScene, VisualConfig,
    generate_floor, generate_sphere,
};
use corewar_marbles_engine::input::{InputAction, InputState, KeyCode};
use corewar_marbles_engine::render::{
    GpuContext, GpuContextConfig, LabelMesh, LabelPass, MeshBuffer, MeshRenderPass,
    ParticleSystem, SceneLights, SceneUniforms, draw_mesh_buffer,
};

/// Longest frame step fed to the simulation (avoids jumps after a stall).
const MAX_FRAME_DT: f32 = 0.1;

/// Marble sphere tessellation.
const MARBLE_SEGMENTS: u32 = 24;

#[derive(Parser, Debug)]
#[command(name = "corewar-marbles", version, about = "Replay a Corewar log as a 3D marble race")]
struct Args {
    /// Corewar VM output to replay
    log: PathBuf,
}

/// Directory holding runtime assets (particle presets).
///
/// Prefers `./assets` so an installed binary can ship its own, falling back
/// to the crate's bundled directory.
fn asset_root() -> PathBuf {
    let local = Path::new("assets");
    if local.is_dir() {
        return local.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

// ============================================================================
// RACE (CPU SIDE)
// ============================================================================

/// Everything that exists before a window does.
struct Race {
    driver: RaceDriver,
    scene: RaceScene,
    layout: RaceConfig,
    visual: VisualConfig,
}

impl Race {
    fn new(reader: LogReader) -> Self {
        let layout = RaceConfig::default();
        let visual = VisualConfig::default();
        Self {
            driver: RaceDriver::new(reader, &layout),
            // Preset files are only read once somebody wins
            scene: RaceScene::new(&layout, &visual, PresetSource::Deferred(asset_root())),
            layout,
            visual,
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: FPSCameraController,
    input: InputState,
    race: Race,

    mesh_pass: MeshRenderPass,
    floor: MeshBuffer,
    marbles: MeshBuffer,
    particles: ParticleSystem,
    labels: LabelPass,
    label_mesh: LabelMesh,

    last_frame: Instant,
}

impl AppState {
    fn new(window: Arc<Window>, race: Race) -> Result<Self> {
        let gpu = GpuContext::new(Arc::clone(&window), GpuContextConfig::default())
            .context("GPU initialisation failed")?;
        let format = gpu.format();

        let mesh_pass = MeshRenderPass::new(&gpu.device, format);

        let white = [1.0; 4];
        let floor_mesh = generate_floor(race.layout.floor_half_extent, 0.0, white);
        let mut floor = mesh_pass.create_mesh_buffer(
            &gpu.device,
            "Floor",
            &floor_mesh.vertices,
            &floor_mesh.indices,
            1,
        );
        floor.write_instances(&gpu.device, &gpu.queue, &[race.scene.floor_instance()]);

        let sphere = generate_sphere(Vec3::ZERO, 1.0, white, MARBLE_SEGMENTS);
        let marbles = mesh_pass.create_mesh_buffer(
            &gpu.device,
            "Marbles",
            &sphere.vertices,
            &sphere.indices,
            race.layout.lane_count(),
        );

        let visual = &race.visual;
        let start = Vec3::new(0.0, 0.0, race.layout.start_z);
        let mut camera = FPSCameraController::looking_at(
            start + Vec3::new(0.0, visual.camera_height, visual.camera_back),
            start,
        );
        camera.sensitivity = visual.look_sensitivity_rad();
        camera.fly_speed = visual.fly_speed;
        camera.sprint_multiplier = visual.sprint_multiplier;
        camera.fov_y = visual.fov_deg.to_radians();

        let particles = ParticleSystem::new(&gpu.device, format);
        let labels = LabelPass::new(&gpu.device, format);

        let mut state = Self {
            window,
            gpu,
            camera,
            input: InputState::new(),
            race,
            mesh_pass,
            floor,
            marbles,
            particles,
            labels,
            label_mesh: LabelMesh::new(),
            last_frame: Instant::now(),
        };
        state.set_cursor_captured(true);
        state.update_title();
        Ok(state)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size.width, size.height);
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        if captured {
            if self.window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                let _ = self.window.set_cursor_grab(CursorGrabMode::Confined);
            }
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        }
        self.window.set_cursor_visible(!captured);
        self.input.mouse.set_captured(captured);
    }

    fn update_title(&self) {
        let cadence = self.race.driver.cadence();
        let (min, max) = cadence.bounds();
        self.window.set_title(&format!(
            "Corewar Marbles - {:.2} s / line ({min:.2}-{max:.2})",
            cadence.seconds()
        ));
    }

    /// Apply a one-shot action. Returns `false` when the app should exit.
    fn handle_action(&mut self, action: InputAction) -> bool {
        let cadence = self.race.driver.cadence_mut();
        let seconds = match action {
            InputAction::ReplayFaster => cadence.faster(),
            InputAction::ReplaySlower => cadence.slower(),
            InputAction::Quit => return false,
            _ => return true,
        };
        let (min, max) = cadence.bounds();
        if seconds <= min || seconds >= max {
            log::info!("Cadence: {seconds:.2} s / line (limit)");
        } else {
            log::info!("Cadence: {seconds:.2} s / line");
        }
        self.update_title();
        true
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;

        let (dx, dy) = self.input.mouse.consume_delta();
        self.camera.apply_mouse_delta(dx, dy);

        let movement = self.input.keyboard.movement;
        self.camera.fly(movement.axes(), dt, movement.is_sprinting());

        let race = &mut self.race;
        for diff in race.driver.update(dt) {
            race.scene.apply(&diff);
        }
        race.scene.sync(race.driver.contenders());

        if let Some(effect) = race.scene.take_winner_effect() {
            self.particles.start_effect(effect.preset, effect.position);
        }
        self.particles.update(dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = self.gpu.dimensions();
        let aspect = self.gpu.aspect_ratio();
        let view_matrix = self.camera.view_matrix();
        let proj_matrix = self.camera.projection_matrix(aspect);
        let view_proj = proj_matrix * view_matrix;

        let visual = &self.race.visual;
        let lights = SceneLights {
            ambient: visual.ambient_color,
            sun_direction: visual.sun_direction,
            sun_color: visual.sun_color,
        };
        self.mesh_pass.upload_uniforms(
            &self.gpu.queue,
            &SceneUniforms::new(view_proj, self.camera.position, &lights),
        );
        self.marbles.write_instances(
            &self.gpu.device,
            &self.gpu.queue,
            &self.race.scene.marble_instances(),
        );
        self.particles.update_uniforms(&self.gpu.queue, view_matrix, proj_matrix);
        self.particles.upload_particles(&self.gpu.queue);

        self.label_mesh.clear();
        self.race
            .scene
            .build_labels(&mut self.label_mesh, view_proj, width as f32, height as f32);
        self.labels
            .prepare(&self.gpu.device, &self.gpu.queue, &self.label_mesh);

        let sky = visual.sky_color;
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: sky.x as f64,
                            g: sky.y as f64,
                            b: sky.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pass.begin(&mut render_pass);
            draw_mesh_buffer(&mut render_pass, &self.floor);
            draw_mesh_buffer(&mut render_pass, &self.marbles);

            // Additive sparkles after opaque geometry
            self.particles.render(&mut render_pass);
        }

        self.labels.render(&mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    race: Option<Race>,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(race) = self.race.take() else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title("Corewar Marbles")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let result = event_loop
            .create_window(window_attrs)
            .context("failed to create window")
            .and_then(|window| AppState::new(Arc::new(window), race));

        match result {
            Ok(state) => {
                log::info!("Ready. WASD/QE fly, Shift sprint, P/O replay speed, ESC quit");
                self.state = Some(state);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => state.resize(new_size),
            WindowEvent::Focused(false) => {
                state.input.release_all();
                state.set_cursor_captured(false);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                if !state.input.mouse.is_captured() {
                    state.set_cursor_captured(true);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if let Some(action) = state.input.handle_key(KeyCode::from_winit(code), pressed) {
                    if !state.handle_action(action) {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                state.update();

                match state.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.gpu.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            state.input.mouse.accumulate_delta(delta.0 as f32, delta.1 as f32);
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let reader = match LogReader::open(&args.log) {
        Ok(reader) => reader,
        Err(e @ LogFileError::NotFound(_)) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", args.log.display()));
        }
    };
    log::info!("Loaded {} lines from {}", reader.len(), args.log.display());

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        race: Some(Race::new(reader)),
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

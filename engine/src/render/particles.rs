//! Winner Sparkle Particle System
//!
//! GPU-instanced billboards used for the winner flourish. Particle physics
//! runs on the CPU in a [`ParticlePool`]; the live particles are uploaded to a
//! storage buffer every frame and drawn as camera-facing quads with additive
//! blending. Emission parameters come from a [`ParticlePreset`].

use glam::Vec3;

use crate::game::particle_presets::ParticlePreset;

/// Maximum number of live particles.
pub const MAX_PARTICLES: usize = 1024;

/// Size of a single GPU particle in bytes (32 bytes)
pub const GPU_PARTICLE_SIZE: usize = std::mem::size_of::<GpuParticle>();

/// Total buffer size in bytes for particle data
pub const PARTICLE_BUFFER_SIZE: usize = MAX_PARTICLES * GPU_PARTICLE_SIZE;

/// Particle uniforms buffer size (128 bytes for view + proj matrices)
pub const PARTICLE_UNIFORMS_SIZE: usize = 128;

/// GPU-side particle record.
///
/// Layout (32 bytes): position (12), lifetime (4), size (4), color (12).
/// The shader mirrors it with eight scalar fields so the array stride stays 32.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3],
    /// Remaining life (1.0 = just spawned, 0.0 = dead)
    pub lifetime: f32,
    /// Billboard half-size in world units
    pub size: f32,
    /// RGB color (HDR values for glow)
    pub color: [f32; 3],
}

const _: () = {
    assert!(
        std::mem::size_of::<GpuParticle>() == 32,
        "GpuParticle must be exactly 32 bytes for GPU compatibility"
    );
};

/// CPU-side particle with physics state.
#[derive(Copy, Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life (1.0 = just spawned, 0.0 = dead)
    pub lifetime: f32,
    /// Life lost per second
    pub decay_rate: f32,
    pub size: f32,
    pub color: [f32; 3],
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::Y,
            lifetime: 1.0,
            decay_rate: 1.0,
            size: 0.2,
            color: [3.0, 2.6, 0.8],
        }
    }
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    pub fn to_gpu(&self) -> GpuParticle {
        GpuParticle {
            position: self.position.to_array(),
            lifetime: self.lifetime,
            size: self.size,
            color: self.color,
        }
    }
}

/// View and projection matrices for billboard expansion (128 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl Default for ParticleUniforms {
    fn default() -> Self {
        Self {
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

static_assertions::assert_eq_size!(ParticleUniforms, [u8; PARTICLE_UNIFORMS_SIZE]);

/// Xorshift32 generator; deterministic so effects replay identically.
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Random f32 in [0.0, 1.0)
    fn next_f32(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        // 24 bits keep the result strictly below 1.0
        (x >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Random f32 in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    fn range2(&mut self, range: [f32; 2]) -> f32 {
        self.range(range[0], range[1])
    }

    /// Uniformly distributed unit vector.
    fn unit_vector(&mut self) -> Vec3 {
        let z = self.range(-1.0, 1.0);
        let theta = self.range(0.0, std::f32::consts::TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), z, r * theta.sin())
    }
}

// ============================================================================
// CPU POOL
// ============================================================================

/// Particle pool with an optional continuous emitter.
///
/// Holds no GPU resources so it can be driven and inspected headlessly.
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: SimpleRng,
    preset: ParticlePreset,
    emitter: Option<Vec3>,
    spawn_accumulator: f32,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(ParticlePreset::default())
    }
}

impl ParticlePool {
    pub fn new(preset: ParticlePreset) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            rng: SimpleRng::new(12345),
            preset,
            emitter: None,
            spawn_accumulator: 0.0,
        }
    }

    pub fn preset(&self) -> &ParticlePreset {
        &self.preset
    }

    pub fn set_preset(&mut self, preset: ParticlePreset) {
        self.preset = preset;
    }

    /// Current emitter position, if emitting.
    pub fn emitter(&self) -> Option<Vec3> {
        self.emitter
    }

    /// Start (or move) the continuous emitter.
    pub fn set_emitter(&mut self, position: Vec3) {
        self.emitter = Some(position);
    }

    /// Stop continuous emission; live particles finish their lives.
    pub fn stop_emitter(&mut self) {
        self.emitter = None;
        self.spawn_accumulator = 0.0;
    }

    /// Emit the preset's burst at `position` and keep emitting from there.
    pub fn start_effect(&mut self, position: Vec3) {
        for _ in 0..self.preset.burst_count {
            self.spawn(position);
        }
        self.set_emitter(position);
    }

    /// Spawn one particle near `origin`. Returns false when the pool is full.
    pub fn spawn(&mut self, origin: Vec3) -> bool {
        let particle = self.create_particle(origin);
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
            return true;
        }
        match self.particles.iter().position(|p| !p.is_alive()) {
            Some(dead_idx) => {
                self.particles[dead_idx] = particle;
                true
            }
            None => false,
        }
    }

    fn create_particle(&mut self, origin: Vec3) -> Particle {
        let preset = &self.preset;
        let (lifetime, speed, size) = (preset.lifetime, preset.speed, preset.size);
        let (bias, radius, colors) = (preset.upward_bias, preset.spawn_radius, preset.colors);

        let offset = self.rng.unit_vector() * self.rng.range(0.0, radius);
        let direction = (self.rng.unit_vector() * (1.0 - bias) + Vec3::Y * bias).normalize_or(Vec3::Y);
        let velocity = direction * self.rng.range2(speed);
        let lifetime_seconds = self.rng.range2(lifetime);
        let size = self.rng.range2(size);

        let t = self.rng.next_f32();
        let color = [
            colors[0][0] + (colors[1][0] - colors[0][0]) * t,
            colors[0][1] + (colors[1][1] - colors[0][1]) * t,
            colors[0][2] + (colors[1][2] - colors[0][2]) * t,
        ];

        Particle {
            position: origin + offset,
            velocity,
            lifetime: 1.0,
            decay_rate: 1.0 / lifetime_seconds.max(0.01),
            size,
            color,
        }
    }

    /// Advance physics and run the emitter.
    pub fn update(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, -self.preset.gravity, 0.0);
        for particle in self.particles.iter_mut().filter(|p| p.is_alive()) {
            particle.velocity += gravity * dt;
            particle.position += particle.velocity * dt;
            particle.lifetime = (particle.lifetime - particle.decay_rate * dt).max(0.0);
        }

        if let Some(origin) = self.emitter {
            self.spawn_accumulator += self.preset.spawn_rate * dt;
            while self.spawn_accumulator >= 1.0 {
                self.spawn_accumulator -= 1.0;
                self.spawn(origin);
            }
        }
    }

    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    pub fn active_count(&self) -> usize {
        self.alive().count()
    }

    /// Drop every particle and stop emitting.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.stop_emitter();
    }
}

// ============================================================================
// GPU SYSTEM
// ============================================================================

/// Particle pool plus the GPU resources needed to draw it.
pub struct ParticleSystem {
    pool: ParticlePool,
    particle_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    /// Particles uploaded by the last `upload_particles`
    uploaded_count: usize,
}

impl ParticleSystem {
    /// Create the pipeline and buffers. `surface_format` is the color target.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Storage Buffer"),
            size: PARTICLE_BUFFER_SIZE as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Uniform Buffer"),
            size: PARTICLE_UNIFORMS_SIZE as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
            entries: &[
                // Binding 0: view/projection
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Binding 1: particles (read-only)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: particle_buffer.as_entire_binding(),
                },
            ],
        });

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sparkle Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../../shaders/sparkle_particle.wgsl").into(),
            ),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_particle"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // Depth tested against marbles, never written
            depth_stencil: Some(wgpu::DepthStencilState {
                format: super::gpu_context::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_particle"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Additive: src * srcAlpha + dst
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pool: ParticlePool::default(),
            particle_buffer,
            uniform_buffer,
            bind_group,
            pipeline,
            uploaded_count: 0,
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    /// Switch to `preset` and start its effect at `position`.
    pub fn start_effect(&mut self, preset: ParticlePreset, position: Vec3) {
        self.pool.set_preset(preset);
        self.pool.start_effect(position);
    }

    pub fn update(&mut self, dt: f32) {
        self.pool.update(dt);
    }

    /// Copy live particles into the storage buffer.
    pub fn upload_particles(&mut self, queue: &wgpu::Queue) {
        let gpu_particles: Vec<GpuParticle> = self
            .pool
            .alive()
            .take(MAX_PARTICLES)
            .map(Particle::to_gpu)
            .collect();
        self.uploaded_count = gpu_particles.len();
        if !gpu_particles.is_empty() {
            queue.write_buffer(&self.particle_buffer, 0, bytemuck::cast_slice(&gpu_particles));
        }
    }

    pub fn update_uniforms(&self, queue: &wgpu::Queue, view: glam::Mat4, proj: glam::Mat4) {
        let uniforms = ParticleUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Draw the particles uploaded last. 6 vertices per particle.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.uploaded_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..6, 0..self.uploaded_count as u32);
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn capacity(&self) -> usize {
        MAX_PARTICLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_preset() -> ParticlePreset {
        ParticlePreset {
            spawn_rate: 10.0,
            burst_count: 5,
            lifetime: [1.0, 1.0],
            speed: [2.0, 2.0],
            upward_bias: 1.0,
            gravity: 0.0,
            size: [0.2, 0.2],
            colors: [[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            spawn_radius: 0.0,
        }
    }

    #[test]
    fn test_gpu_particle_size() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 32);
        assert_eq!(PARTICLE_BUFFER_SIZE, 32768);
    }

    #[test]
    fn test_uniforms_size() {
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 128);
    }

    #[test]
    fn test_particle_to_gpu() {
        let particle = Particle {
            position: Vec3::new(1.0, 2.0, 3.0),
            lifetime: 0.5,
            size: 0.2,
            color: [2.0, 0.6, 0.1],
            ..Default::default()
        };
        let gpu = particle.to_gpu();
        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.lifetime, 0.5);
        assert_eq!(gpu.size, 0.2);
        assert_eq!(gpu.color, [2.0, 0.6, 0.1]);
    }

    #[test]
    fn test_simple_rng() {
        let mut rng = SimpleRng::new(42);
        let v1 = rng.next_f32();
        let v2 = rng.next_f32();
        assert!((0.0..1.0).contains(&v1));
        assert!((0.0..1.0).contains(&v2));
        assert_ne!(v1, v2);

        let mut rng2 = SimpleRng::new(42);
        assert_eq!(rng2.next_f32(), v1);
    }

    #[test]
    fn test_rng_unit_vector() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..100 {
            let v = rng.unit_vector();
            assert!((v.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_start_effect_bursts_and_emits() {
        let mut pool = ParticlePool::new(quiet_preset());
        pool.start_effect(Vec3::new(5.0, 1.0, -20.0));
        assert_eq!(pool.active_count(), 5);
        assert_eq!(pool.emitter(), Some(Vec3::new(5.0, 1.0, -20.0)));

        // 10 per second for half a second
        pool.update(0.5);
        assert_eq!(pool.active_count(), 10);
    }

    #[test]
    fn test_particles_rise_with_full_upward_bias() {
        let mut pool = ParticlePool::new(quiet_preset());
        pool.spawn(Vec3::ZERO);
        pool.update(0.25);
        let p = pool.alive().next().unwrap();
        assert!((p.position.y - 0.5).abs() < 1e-4);
        assert!(p.position.x.abs() < 1e-4);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let preset = ParticlePreset {
            gravity: 10.0,
            ..quiet_preset()
        };
        let mut pool = ParticlePool::new(preset);
        pool.spawn(Vec3::ZERO);
        pool.update(0.5);
        let p = pool.alive().next().unwrap();
        assert!(p.velocity.y < 2.0);
    }

    #[test]
    fn test_particles_expire() {
        let mut pool = ParticlePool::new(quiet_preset());
        pool.spawn(Vec3::ZERO);
        pool.update(1.1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_stop_emitter_lets_particles_die_out() {
        let mut pool = ParticlePool::new(quiet_preset());
        pool.start_effect(Vec3::ZERO);
        pool.stop_emitter();
        pool.update(0.5);
        assert_eq!(pool.active_count(), 5);
        pool.update(0.6);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_pool_capacity_is_bounded() {
        let preset = ParticlePreset {
            burst_count: (MAX_PARTICLES + 50) as u32,
            ..quiet_preset()
        };
        let mut pool = ParticlePool::new(preset);
        pool.start_effect(Vec3::ZERO);
        assert_eq!(pool.active_count(), MAX_PARTICLES);
        assert!(!pool.spawn(Vec3::ZERO));
    }

    #[test]
    fn test_color_between_preset_colors() {
        let preset = ParticlePreset {
            colors: [[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]],
            ..quiet_preset()
        };
        let mut pool = ParticlePool::new(preset);
        for _ in 0..20 {
            pool.spawn(Vec3::ZERO);
        }
        for p in pool.alive() {
            assert!((0.0..=2.0).contains(&p.color[0]));
            assert!((p.color[1] - p.color[0] * 2.0).abs() < 1e-4);
        }
    }
}

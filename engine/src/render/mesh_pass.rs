//! Mesh Render Pass
//!
//! Lit, depth-tested, instanced mesh rendering. Every mesh is drawn with a
//! per-instance translation, uniform scale and tint, so one sphere mesh
//! serves every marble and one quad serves the floor.
//!
//! Lighting is one ambient term plus one directional sun (Lambert).

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// Vertex for mesh rendering (position, normal, color)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 40]);

/// Per-instance data (32 bytes)
///
/// - offset: vec3<f32> - World translation
/// - scale:  f32       - Uniform scale
/// - tint:   vec4<f32> - Multiplied with the vertex color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshInstance {
    pub offset: [f32; 3],
    pub scale: f32,
    pub tint: [f32; 4],
}

static_assertions::assert_eq_size!(MeshInstance, [u8; 32]);

impl Default for MeshInstance {
    fn default() -> Self {
        Self {
            offset: [0.0; 3],
            scale: 1.0,
            tint: [1.0; 4],
        }
    }
}

impl MeshInstance {
    pub fn at(offset: Vec3, tint: [f32; 4]) -> Self {
        Self {
            offset: offset.into(),
            scale: 1.0,
            tint,
        }
    }
}

/// Scene uniforms (128 bytes)
///
/// Vectors are padded to vec4 so the layout matches WGSL uniform rules.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera position
    pub camera_pos: [f32; 4],
    /// rgb = ambient light
    pub ambient: [f32; 4],
    /// xyz = normalized direction the sun light travels
    pub sun_dir: [f32; 4],
    /// rgb = sun color
    pub sun_color: [f32; 4],
}

static_assertions::assert_eq_size!(SceneUniforms, [u8; 128]);

/// Ambient + directional light setup.
#[derive(Clone, Copy, Debug)]
pub struct SceneLights {
    pub ambient: Vec3,
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4, camera_pos: Vec3, lights: &SceneLights) -> Self {
        let sun = lights.sun_direction.normalize_or(Vec3::NEG_Y);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).into(),
            ambient: lights.ambient.extend(0.0).into(),
            sun_dir: sun.extend(0.0).into(),
            sun_color: lights.sun_color.extend(0.0).into(),
        }
    }
}

/// Geometry plus a growable instance buffer.
pub struct MeshBuffer {
    pub label: &'static str,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

impl MeshBuffer {
    /// Replace the instance list, growing the GPU buffer when needed.
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[MeshInstance],
    ) {
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.label, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{} Instance Buffer", label)),
        size: (capacity.max(1) * std::mem::size_of::<MeshInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Pipeline, uniforms and bind group shared by every mesh.
pub struct MeshRenderPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
}

impl MeshRenderPass {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader_source = include_str!("../../../shaders/marble_scene.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Marble Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 0,
                                shader_location: 0,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 12,
                                shader_location: 1,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x4,
                                offset: 24,
                                shader_location: 2,
                            },
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x4,
                                offset: 0,
                                shader_location: 3,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x4,
                                offset: 16,
                                shader_location: 4,
                            },
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Floor is two-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: super::gpu_context::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
        }
    }

    /// Upload uniforms to GPU
    pub fn upload_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Create a mesh buffer from vertex/index data
    pub fn create_mesh_buffer(
        &self,
        device: &wgpu::Device,
        label: &'static str,
        vertices: &[MeshVertex],
        indices: &[u32],
        instance_capacity: usize,
    ) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = instance_capacity.max(1);
        MeshBuffer {
            label,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer: create_instance_buffer(device, label, instance_capacity),
            instance_capacity,
            instance_count: 0,
        }
    }

    /// Bind the pipeline once before drawing any mesh buffers.
    pub fn begin(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

/// Draw every instance of a mesh buffer (pipeline must already be bound)
pub fn draw_mesh_buffer(render_pass: &mut wgpu::RenderPass<'_>, mesh_buffer: &MeshBuffer) {
    if mesh_buffer.index_count > 0 && mesh_buffer.instance_count > 0 {
        render_pass.set_vertex_buffer(0, mesh_buffer.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, mesh_buffer.instance_buffer.slice(..));
        render_pass.set_index_buffer(mesh_buffer.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh_buffer.index_count, 0, 0..mesh_buffer.instance_count);
    }
}

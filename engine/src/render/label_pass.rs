//! Label Render Pass
//!
//! Draws flat 2D geometry (contender name labels) on top of the 3D scene.
//! Vertices are already in normalized device coordinates; there is no depth
//! test and colors are alpha blended.

/// Screen-space vertex: NDC position plus RGBA color (24 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LabelVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(LabelVertex, [u8; 24]);

/// Indexed quads collected for one frame.
#[derive(Clone, Debug, Default)]
pub struct LabelMesh {
    pub vertices: Vec<LabelVertex>,
    pub indices: Vec<u32>,
}

impl LabelMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned quad given two NDC corners.
    pub fn add_quad(&mut self, min: [f32; 2], max: [f32; 2], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for position in [
            [min[0], max[1]],
            [max[0], max[1]],
            [max[0], min[1]],
            [min[0], min[1]],
        ] {
            self.vertices.push(LabelVertex { position, color });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Pixel coordinates (origin top-left) to NDC.
    pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> [f32; 2] {
        [(x / width) * 2.0 - 1.0, 1.0 - (y / height) * 2.0]
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// Pipeline and growable buffers for [`LabelMesh`] drawing.
pub struct LabelPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl LabelPass {
    const INITIAL_VERTEX_BYTES: u64 = 256 * 1024;
    const INITIAL_INDEX_BYTES: u64 = 64 * 1024;

    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Label Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/label_text.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Label Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Label Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_label"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LabelVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x4,
                            offset: 8,
                            shader_location: 1,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_label"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = Self::create_buffer(
            device,
            "Label Vertex Buffer",
            Self::INITIAL_VERTEX_BYTES,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = Self::create_buffer(
            device,
            "Label Index Buffer",
            Self::INITIAL_INDEX_BYTES,
            wgpu::BufferUsages::INDEX,
        );

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: 0,
        }
    }

    fn create_buffer(
        device: &wgpu::Device,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload this frame's labels, growing the buffers when needed.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &LabelMesh) {
        self.index_count = mesh.indices.len() as u32;
        if mesh.is_empty() {
            return;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        if vertex_bytes.len() as u64 > self.vertex_buffer.size() {
            self.vertex_buffer = Self::create_buffer(
                device,
                "Label Vertex Buffer",
                (vertex_bytes.len() as u64).next_power_of_two(),
                wgpu::BufferUsages::VERTEX,
            );
        }
        if index_bytes.len() as u64 > self.index_buffer.size() {
            self.index_buffer = Self::create_buffer(
                device,
                "Label Index Buffer",
                (index_bytes.len() as u64).next_power_of_two(),
                wgpu::BufferUsages::INDEX,
            );
        }

        queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        queue.write_buffer(&self.index_buffer, 0, index_bytes);
    }

    /// Draw the prepared labels over whatever `color_view` already holds.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, color_view: &wgpu::TextureView) {
        if self.index_count == 0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Label Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

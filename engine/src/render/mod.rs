//! Render Module
//!
//! wgpu rendering for the marble race: GPU context, lit instanced meshes,
//! winner particles and screen-space labels.

pub mod gpu_context;
pub mod label_pass;
pub mod mesh_pass;
pub mod particles;

pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig, GpuInitError};
pub use label_pass::{LabelMesh, LabelPass, LabelVertex};
pub use mesh_pass::{
    MeshBuffer, MeshInstance, MeshRenderPass, MeshVertex, SceneLights, SceneUniforms,
    draw_mesh_buffer,
};
pub use particles::{GpuParticle, MAX_PARTICLES, ParticlePool, ParticleSystem};

//! wgpu building blocks for the orrery: device and surface setup, buffers,
//! the shared camera uniform channel, textures, shader programs, and the
//! off-screen target used for post-processing.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod offscreen;
pub mod pass;
pub mod projection;
pub mod shader;
pub mod texture;
pub mod uniform;

pub use buffer::{
    BufferAllocator, ColorVertex, GlyphVertex, IndexData, MeshBuffer, PositionVertex,
    SphereVertex, StreamBuffer,
};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use offscreen::{OffscreenError, OffscreenTarget, validate_attachment};
pub use pass::{FrameEncoder, PassTarget, RenderPassBuilder, SPACE_BLACK};
pub use projection::{aspect_ratio, reverse_z_perspective};
pub use shader::{BindingSlot, Program, ProgramContract, ShaderError, ShaderLibrary, UniformTable};
pub use texture::{
    ChannelLayout, ColorSpace, GpuTexture, PixelBuffer, SamplerMode, TextureError, TextureTable,
};
pub use uniform::{CameraUniform, DynamicUniforms, UniformChannel, aligned_stride};

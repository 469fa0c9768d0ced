//! GPU resources: buffers and textures.

pub use crate::resource::dynamic_buffer::{DynamicUniformBuffer, UniformArena};
pub use crate::resource::gpu_vector::{BufferType, GpuVec};
pub use crate::resource::texture::Texture;

mod dynamic_buffer;
mod gpu_vector;
mod texture;

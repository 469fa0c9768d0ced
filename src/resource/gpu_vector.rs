//! Vertex and index data kept on the RAM and mirrored into a wgpu buffer.

use crate::context::Context;
use bytemuck::Pod;

/// A vector of elements that can be loaded to the GPU.
///
/// The RAM copy is authoritative: mutate it through [`GpuVec::data_mut`] and
/// the next [`GpuVec::load_to_gpu`] uploads it again.
pub struct GpuVec<T: Pod> {
    dirty: bool,
    usage: wgpu::BufferUsages,
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    data: Vec<T>,
}

impl<T: Pod> GpuVec<T> {
    /// Creates a new `GpuVec` that is not yet uploaded to the GPU.
    pub fn new(data: Vec<T>, buf_type: BufferType, label: &'static str) -> GpuVec<T> {
        GpuVec {
            dirty: true,
            usage: buf_type.to_wgpu(),
            label,
            buffer: None,
            data,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutably accesses the RAM copy.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutably accesses the RAM copy.
    ///
    /// This method will mark this vector as `dirty`.
    #[inline]
    pub fn data_mut(&mut self) -> &mut Vec<T> {
        self.dirty = true;
        &mut self.data
    }

    /// Returns `true` if the RAM and GPU copies are out of sync.
    #[inline]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the wgpu buffer if it exists.
    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Uploads the RAM copy if it changed since the last upload.
    ///
    /// The buffer is reused when the data still fits in it. Empty vectors are
    /// never uploaded.
    pub fn load_to_gpu(&mut self) {
        if !self.dirty || self.data.is_empty() {
            return;
        }

        let ctxt = Context::get();
        let bytes: &[u8] = bytemuck::cast_slice(&self.data);

        match self.buffer.as_ref() {
            Some(buffer) if bytes.len() as u64 <= buffer.size() => {
                ctxt.write_buffer(buffer, 0, bytes);
            }
            _ => {
                let buffer = ctxt.create_buffer_init(
                    Some(self.label),
                    bytes,
                    self.usage | wgpu::BufferUsages::COPY_DST,
                );
                self.buffer = Some(buffer);
            }
        }

        self.dirty = false;
    }
}

/// Type of gpu buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferType {
    /// A vertex buffer (bindable as vertex data).
    Array,
    /// An index buffer (bindable as index data).
    ElementArray,
}

impl BufferType {
    /// Converts to wgpu buffer usages.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::BufferUsages {
        match self {
            BufferType::Array => wgpu::BufferUsages::VERTEX,
            BufferType::ElementArray => wgpu::BufferUsages::INDEX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_marks_dirty() {
        let mut v = GpuVec::new(vec![1.0f32, 2.0], BufferType::Array, "test");
        assert!(v.dirty());
        assert_eq!(v.len(), 2);
        assert!(v.buffer().is_none());

        v.data_mut().push(3.0);
        assert_eq!(v.data(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn buffer_types_map_to_usages() {
        assert_eq!(BufferType::Array.to_wgpu(), wgpu::BufferUsages::VERTEX);
        assert_eq!(BufferType::ElementArray.to_wgpu(), wgpu::BufferUsages::INDEX);
    }
}

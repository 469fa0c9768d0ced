//! Per-draw uniforms packed into a single GPU buffer.
//!
//! Every draw of a frame pushes its uniforms into a CPU-side arena; the arena
//! is then written to the GPU once and each draw binds its own slice through a
//! dynamic offset.

use crate::context::Context;
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem;

/// CPU-side packing of uniform entries at a fixed alignment.
#[derive(Clone, Debug)]
pub struct UniformArena<T: Pod> {
    data: Vec<u8>,
    aligned_size: u64,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformArena<T> {
    /// Creates an arena whose entries start at multiples of `alignment` bytes.
    ///
    /// `alignment` is rounded up to a power of two.
    pub fn new(alignment: u32) -> Self {
        let alignment = (alignment.max(1) as u64).next_power_of_two();
        let unaligned_size = (mem::size_of::<T>() as u64).max(1);

        Self {
            data: Vec::new(),
            aligned_size: unaligned_size.div_ceil(alignment) * alignment,
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Distance in bytes between two consecutive entries.
    #[inline]
    pub fn aligned_size(&self) -> u64 {
        self.aligned_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Forgets every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
        self.count = 0;
    }

    /// Appends an entry and returns its byte offset.
    pub fn push(&mut self, value: &T) -> u32 {
        let offset = (self.count as u64 * self.aligned_size) as u32;

        let bytes = bytemuck::bytes_of(value);
        self.data.extend_from_slice(bytes);
        self.data
            .extend(std::iter::repeat_n(0u8, self.aligned_size as usize - bytes.len()));

        self.count += 1;
        offset
    }

    /// The packed bytes of every entry.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// A GPU uniform buffer fed from a [`UniformArena`].
pub struct DynamicUniformBuffer<T: Pod> {
    arena: UniformArena<T>,
    buffer: wgpu::Buffer,
    capacity: u64,
    label: &'static str,
}

impl<T: Pod> DynamicUniformBuffer<T> {
    /// Creates a buffer with room for 64 entries; it grows as needed.
    pub fn new(label: &'static str) -> Self {
        let ctxt = Context::get();
        let arena = UniformArena::new(ctxt.uniform_offset_alignment());
        let capacity = arena.aligned_size() * 64;
        let buffer = Self::allocate(&ctxt, label, capacity);

        Self {
            arena,
            buffer,
            capacity,
            label,
        }
    }

    fn allocate(ctxt: &Context, label: &str, size: u64) -> wgpu::Buffer {
        ctxt.create_buffer(
            Some(label),
            size,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    /// Size of the slice bound for one entry.
    pub fn binding_size() -> wgpu::BufferSize {
        wgpu::BufferSize::new(mem::size_of::<T>() as u64)
            .expect("uniform types are never zero-sized")
    }

    #[inline]
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Queues an entry; see [`UniformArena::push`].
    #[inline]
    pub fn push(&mut self, value: &T) -> u32 {
        self.arena.push(value)
    }

    /// Writes the queued entries to the GPU.
    ///
    /// Returns `true` if the buffer had to be reallocated, in which case bind
    /// groups referencing it must be recreated.
    pub fn flush(&mut self) -> bool {
        if self.arena.is_empty() {
            return false;
        }

        let ctxt = Context::get();
        let required = self.arena.bytes().len() as u64;
        let reallocated = required > self.capacity;

        if reallocated {
            while self.capacity < required {
                self.capacity *= 2;
            }
            self.buffer = Self::allocate(&ctxt, self.label, self.capacity);
        }

        ctxt.write_buffer(&self.buffer, 0, self.arena.bytes());
        reallocated
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Entry {
        value: [f32; 5],
    }

    #[test]
    fn entries_start_at_aligned_offsets() {
        let mut arena = UniformArena::<Entry>::new(256);
        assert_eq!(arena.aligned_size(), 256);

        assert_eq!(arena.push(&Entry { value: [1.0; 5] }), 0);
        assert_eq!(arena.push(&Entry { value: [2.0; 5] }), 256);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.bytes().len(), 512);

        let second: Vec<f32> = arena.bytes()[256..276]
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(second, [2.0; 5]);
        assert!(arena.bytes()[20..256].iter().all(|&b| b == 0));
    }

    #[test]
    fn small_alignments_still_fit_the_entry() {
        let arena = UniformArena::<Entry>::new(16);
        assert_eq!(arena.aligned_size(), 32);

        let arena = UniformArena::<Entry>::new(3);
        assert_eq!(arena.aligned_size() % 4, 0);
        assert!(arena.aligned_size() >= 20);
    }

    #[test]
    fn clear_restarts_offsets() {
        let mut arena = UniformArena::<Entry>::new(64);
        arena.push(&Entry { value: [0.0; 5] });
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.push(&Entry { value: [0.0; 5] }), 0);
    }
}

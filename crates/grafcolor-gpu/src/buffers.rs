//! Scoped device resources.
//!
//! [`DeviceBuffer`] and [`DeviceKernel`] own one backend handle each and
//! release it on drop. Orchestrators create run-level buffers once and
//! per-round scratch buffers inside the round, so every exit path, early
//! `?` returns included, frees what was acquired.

use grafcolor_types::GrafcolorResult;

use crate::backend::{BufferAccess, BufferId, ComputeBackend, KernelArg, KernelId, KernelSource};
use crate::kernels::bytes_to_words;

/// Smallest allocation requested from a backend; zero-size buffers are
/// invalid on OpenCL.
const MIN_BUFFER_BYTES: usize = 4;

/// A backend buffer released on drop.
pub struct DeviceBuffer<'a, B: ComputeBackend + ?Sized> {
    backend: &'a B,
    id: BufferId,
    size: usize,
}

impl<'a, B: ComputeBackend + ?Sized> DeviceBuffer<'a, B> {
    /// Allocates a buffer initialized with `data`.
    pub fn upload(backend: &'a B, access: BufferAccess, data: &[u8]) -> GrafcolorResult<Self> {
        let size = data.len().max(MIN_BUFFER_BYTES);
        let id = backend.create_buffer(size, access, Some(data))?;
        Ok(Self { backend, id, size })
    }

    /// Allocates a buffer initialized with `words`.
    pub fn upload_words(backend: &'a B, access: BufferAccess, words: &[u32]) -> GrafcolorResult<Self> {
        Self::upload(backend, access, bytemuck::cast_slice(words))
    }

    /// Allocates a zero-filled buffer of `size_bytes`.
    pub fn zeroed(backend: &'a B, access: BufferAccess, size_bytes: usize) -> GrafcolorResult<Self> {
        let size = size_bytes.max(MIN_BUFFER_BYTES);
        let zeros = vec![0u8; size];
        let id = backend.create_buffer(size, access, Some(&zeros))?;
        Ok(Self { backend, id, size })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Allocated size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// This buffer as a kernel argument.
    pub fn arg(&self) -> KernelArg {
        KernelArg::Buffer(self.id)
    }

    pub fn write(&self, data: &[u8]) -> GrafcolorResult<()> {
        self.backend.write_buffer(self.id, data)
    }

    pub fn write_words(&self, words: &[u32]) -> GrafcolorResult<()> {
        self.write(bytemuck::cast_slice(words))
    }

    /// Reads the first `len` bytes back to the host.
    pub fn read_bytes(&self, len: usize) -> GrafcolorResult<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.backend.read_buffer(self.id, &mut out)?;
        Ok(out)
    }

    /// Reads the first `count` words back to the host.
    pub fn read_words(&self, count: usize) -> GrafcolorResult<Vec<u32>> {
        Ok(bytes_to_words(&self.read_bytes(count * 4)?))
    }
}

impl<B: ComputeBackend + ?Sized> Drop for DeviceBuffer<'_, B> {
    fn drop(&mut self) {
        self.backend.release_buffer(self.id);
    }
}

/// A built kernel released on drop.
pub struct DeviceKernel<'a, B: ComputeBackend + ?Sized> {
    backend: &'a B,
    id: KernelId,
    entry_point: String,
}

impl<'a, B: ComputeBackend + ?Sized> DeviceKernel<'a, B> {
    /// Builds `entry_point` from `source`.
    pub fn build(backend: &'a B, source: &KernelSource, entry_point: &str) -> GrafcolorResult<Self> {
        let id = backend.build_kernel(source, entry_point)?;
        tracing::debug!(backend = backend.name(), entry_point, "kernel built");
        Ok(Self {
            backend,
            id,
            entry_point: entry_point.to_string(),
        })
    }

    pub fn id(&self) -> KernelId {
        self.id
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn set_arg(&self, index: u32, arg: KernelArg) -> GrafcolorResult<()> {
        self.backend.set_kernel_arg(self.id, index, arg)
    }

    /// Binds `args` to indices `0..args.len()`.
    pub fn set_args(&self, args: &[KernelArg]) -> GrafcolorResult<()> {
        for (index, &arg) in args.iter().enumerate() {
            self.set_arg(index as u32, arg)?;
        }
        Ok(())
    }

    /// Dispatches over `global_work_size` items and waits for completion.
    pub fn dispatch(&self, global_work_size: usize) -> GrafcolorResult<()> {
        self.backend.dispatch(self.id, global_work_size)?;
        self.backend.synchronize()
    }
}

impl<B: ComputeBackend + ?Sized> Drop for DeviceKernel<'_, B> {
    fn drop(&mut self) {
        self.backend.release_kernel(self.id);
    }
}

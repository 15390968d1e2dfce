//! # grafcolor-gpu
//!
//! Compute backend abstraction for the coloring orchestrators.
//!
//! Provides a [`ComputeBackend`] trait with two implementations:
//! - [`CpuFallback`] — Reference CPU implementation of the coloring
//!   kernels (always available)
//! - `OpenClBackend` — OpenCL device backend (`opencl` feature)
//!
//! Device resources are held through the scoped guards in [`buffers`],
//! which release their handle when dropped, so an orchestrator that
//! aborts part-way through a run leaks nothing.

pub mod backend;
pub mod buffers;
pub mod kernels;
#[cfg(feature = "opencl")]
pub mod opencl;

pub use backend::{
    BufferAccess, BufferId, ComputeBackend, CpuFallback, Fault, KernelArg, KernelId, KernelSource,
};
pub use buffers::{DeviceBuffer, DeviceKernel};
#[cfg(feature = "opencl")]
pub use opencl::OpenClBackend;

//! OpenCL compute backend.
//!
//! Runs the coloring kernels on the first GPU device (any OpenCL device
//! if no GPU is present). Programs are built from the embedded sources in
//! `kernels/` or from a user-supplied file; build failures carry the
//! device compiler's log.

use std::collections::HashMap;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{get_all_devices, Device, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_GPU};
use opencl3::kernel::Kernel;
use opencl3::memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY};
use opencl3::program::Program;
use opencl3::types::{cl_device_type, cl_mem_flags, cl_uint, CL_BLOCKING};

use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::backend::{BufferAccess, BufferId, ComputeBackend, KernelArg, KernelId, KernelSource};

/// Device, context and queue created by `init`.
struct ClDevice {
    _device: Device,
    context: Context,
    queue: CommandQueue,
    name: String,
    is_gpu: bool,
}

/// A built kernel; the program must outlive it.
struct ClKernel {
    kernel: Kernel,
    _program: Program,
}

#[derive(Default)]
struct ClObjects {
    next_handle: u32,
    buffers: HashMap<u32, Buffer<u8>>,
    kernels: HashMap<u32, ClKernel>,
}

/// OpenCL device backend.
pub struct OpenClBackend {
    device: Option<ClDevice>,
    objects: Mutex<ClObjects>,
}

// SAFETY: OpenCL contexts, queues, programs, kernels and memory objects are
// thread-safe in OpenCL 1.2, except `clSetKernelArg`; kernel
// argument binding and dispatch happen under the `objects` lock.
unsafe impl Send for OpenClBackend {}
unsafe impl Sync for OpenClBackend {}

impl OpenClBackend {
    /// Creates an uninitialized backend; call `init` before use.
    pub fn new() -> Self {
        Self {
            device: None,
            objects: Mutex::new(ClObjects::default()),
        }
    }

    /// Name of the selected device, once initialized.
    pub fn device_name(&self) -> Option<&str> {
        self.device.as_ref().map(|d| d.name.as_str())
    }

    fn device(&self) -> GrafcolorResult<&ClDevice> {
        self.device
            .as_ref()
            .ok_or_else(|| GrafcolorError::BackendUnavailable("opencl backend used before init".into()))
    }

    fn objects(&self) -> MutexGuard<'_, ClObjects> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OpenClBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn mem_flags(access: BufferAccess) -> cl_mem_flags {
    match access {
        BufferAccess::ReadOnly => CL_MEM_READ_ONLY,
        BufferAccess::WriteOnly => CL_MEM_WRITE_ONLY,
        BufferAccess::ReadWrite => CL_MEM_READ_WRITE,
    }
}

impl ComputeBackend for OpenClBackend {
    fn init(&mut self) -> GrafcolorResult<()> {
        let all_ids = get_all_devices(CL_DEVICE_TYPE_ALL)
            .map_err(|e| GrafcolorError::BackendUnavailable(format!("no OpenCL platform: {e}")))?;
        let gpu_ids = get_all_devices(CL_DEVICE_TYPE_GPU).unwrap_or_default();
        let selected = gpu_ids
            .first()
            .or_else(|| all_ids.first())
            .copied()
            .ok_or_else(|| GrafcolorError::BackendUnavailable("no OpenCL device found".into()))?;

        let device = Device::new(selected);
        let name = device.name().unwrap_or_default().trim().to_string();
        let dev_type: cl_device_type = device.dev_type().unwrap_or(0);
        let is_gpu = (dev_type & CL_DEVICE_TYPE_GPU) != 0;

        let context = Context::from_device(&device)
            .map_err(|e| GrafcolorError::BackendUnavailable(format!("context creation failed: {e}")))?;
        // OpenCL 1.2 queue API; 2.0 is not available everywhere.
        #[allow(deprecated)]
        let queue = CommandQueue::create_default(&context, 0)
            .map_err(|e| GrafcolorError::BackendUnavailable(format!("queue creation failed: {e}")))?;

        tracing::info!(device = %name, is_gpu, "opencl backend initialized");
        self.device = Some(ClDevice {
            _device: device,
            context,
            queue,
            name,
            is_gpu,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "opencl"
    }

    fn is_gpu(&self) -> bool {
        self.device.as_ref().map_or(false, |d| d.is_gpu)
    }

    fn build_kernel(&self, source: &KernelSource, entry_point: &str) -> GrafcolorResult<KernelId> {
        let device = self.device()?;
        let text = source.text(entry_point)?;
        let program = Program::create_and_build_from_source(&device.context, &text, "")
            .map_err(|log| GrafcolorError::Compile {
                entry_point: entry_point.to_string(),
                log,
            })?;
        let kernel = Kernel::create(&program, entry_point).map_err(|e| GrafcolorError::Compile {
            entry_point: entry_point.to_string(),
            log: e.to_string(),
        })?;

        let mut objects = self.objects();
        let id = objects.next_handle;
        objects.next_handle += 1;
        objects.kernels.insert(
            id,
            ClKernel {
                kernel,
                _program: program,
            },
        );
        Ok(KernelId(id))
    }

    fn create_buffer(
        &self,
        size_bytes: usize,
        access: BufferAccess,
        initial: Option<&[u8]>,
    ) -> GrafcolorResult<BufferId> {
        let device = self.device()?;
        let mut buffer = unsafe {
            Buffer::<u8>::create(&device.context, mem_flags(access), size_bytes, ptr::null_mut())
                .map_err(|e| GrafcolorError::Allocation(format!("{size_bytes} bytes: {e}")))?
        };
        if let Some(data) = initial {
            let event = unsafe {
                device
                    .queue
                    .enqueue_write_buffer(&mut buffer, CL_BLOCKING, 0, data, &[])
                    .map_err(|e| GrafcolorError::Allocation(format!("initial upload failed: {e}")))?
            };
            event
                .wait()
                .map_err(|e| GrafcolorError::Allocation(format!("initial upload failed: {e}")))?;
        }

        let mut objects = self.objects();
        let id = objects.next_handle;
        objects.next_handle += 1;
        objects.buffers.insert(id, buffer);
        Ok(BufferId(id))
    }

    fn write_buffer(&self, buffer: BufferId, data: &[u8]) -> GrafcolorResult<()> {
        let device = self.device()?;
        let mut objects = self.objects();
        let target = objects
            .buffers
            .get_mut(&buffer.0)
            .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown buffer {}", buffer.0)))?;
        unsafe {
            device
                .queue
                .enqueue_write_buffer(target, CL_BLOCKING, 0, data, &[])
                .map_err(|e| GrafcolorError::Dispatch(format!("buffer write failed: {e}")))?;
        }
        Ok(())
    }

    fn set_kernel_arg(&self, kernel: KernelId, index: u32, arg: KernelArg) -> GrafcolorResult<()> {
        self.device()?;
        let objects = self.objects();
        let entry = objects
            .kernels
            .get(&kernel.0)
            .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown kernel {}", kernel.0)))?;
        let result = match arg {
            KernelArg::Buffer(id) => {
                let buffer = objects
                    .buffers
                    .get(&id.0)
                    .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown buffer {}", id.0)))?;
                unsafe { entry.kernel.set_arg(index as cl_uint, buffer) }
            }
            KernelArg::Uint(value) => {
                let value = value as cl_uint;
                unsafe { entry.kernel.set_arg(index as cl_uint, &value) }
            }
        };
        result.map_err(|e| GrafcolorError::Dispatch(format!("argument {index}: {e}")))
    }

    fn dispatch(&self, kernel: KernelId, global_work_size: usize) -> GrafcolorResult<()> {
        let device = self.device()?;
        if global_work_size == 0 {
            return Ok(());
        }
        let objects = self.objects();
        let entry = objects
            .kernels
            .get(&kernel.0)
            .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown kernel {}", kernel.0)))?;
        let global = [global_work_size];
        unsafe {
            device
                .queue
                .enqueue_nd_range_kernel(
                    entry.kernel.get(),
                    1,
                    ptr::null(),
                    global.as_ptr(),
                    ptr::null(),
                    &[],
                )
                .map_err(|e| GrafcolorError::Dispatch(e.to_string()))?;
        }
        Ok(())
    }

    fn read_buffer(&self, buffer: BufferId, out: &mut [u8]) -> GrafcolorResult<()> {
        let device = self.device()?;
        let objects = self.objects();
        let source = objects
            .buffers
            .get(&buffer.0)
            .ok_or_else(|| GrafcolorError::Readback(format!("unknown buffer {}", buffer.0)))?;
        let event = unsafe {
            device
                .queue
                .enqueue_read_buffer(source, CL_BLOCKING, 0, out, &[])
                .map_err(|e| GrafcolorError::Readback(e.to_string()))?
        };
        event
            .wait()
            .map_err(|e| GrafcolorError::Readback(e.to_string()))
    }

    fn synchronize(&self) -> GrafcolorResult<()> {
        self.device()?
            .queue
            .finish()
            .map_err(|e| GrafcolorError::Sync(e.to_string()))
    }

    fn release_buffer(&self, buffer: BufferId) {
        self.objects().buffers.remove(&buffer.0);
    }

    fn release_kernel(&self, kernel: KernelId) {
        self.objects().kernels.remove(&kernel.0);
    }
}

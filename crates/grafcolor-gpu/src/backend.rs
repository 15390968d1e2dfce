//! Compute backend trait and CPU fallback.
//!
//! The [`ComputeBackend`] trait is the host-side protocol the coloring
//! orchestrators speak: build a kernel, create buffers, bind arguments,
//! dispatch over a 1-D range, synchronize, read results back, release.
//! The [`CpuFallback`] implementation executes the built-in kernels
//! sequentially on the host, serving as a reference for correctness.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::kernels::BuiltinKernel;

/// Opaque handle to a device buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Opaque handle to a built kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelId(pub u32);

/// How kernels may access a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl BufferAccess {
    /// Returns true if kernels may write the buffer.
    pub fn kernel_writable(self) -> bool {
        !matches!(self, BufferAccess::ReadOnly)
    }
}

/// A kernel argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelArg {
    Buffer(BufferId),
    Uint(u32),
}

/// Where kernel source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    /// Source shipped with the crate.
    Embedded(&'static str),
    /// Source file read at build time.
    File(PathBuf),
}

/// Luby independent-set kernel source.
const LUBY_KERNEL_SOURCE: &str = include_str!("../kernels/lubyColor.cl");

/// Vertex-independent-set group kernel source.
const VIS_KERNEL_SOURCE: &str = include_str!("../kernels/individualSet.cl");

impl KernelSource {
    /// The embedded Luby kernel (`getISSet`).
    pub fn luby() -> Self {
        KernelSource::Embedded(LUBY_KERNEL_SOURCE)
    }

    /// The embedded group kernel (`kernelColor`).
    pub fn vertex_independent_set() -> Self {
        KernelSource::Embedded(VIS_KERNEL_SOURCE)
    }

    /// Returns the source text, reading it from disk if needed.
    pub fn text(&self, entry_point: &str) -> GrafcolorResult<Cow<'static, str>> {
        match self {
            KernelSource::Embedded(text) => Ok(Cow::Borrowed(text)),
            KernelSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| GrafcolorError::Compile {
                    entry_point: entry_point.to_string(),
                    log: format!("cannot read {}: {e}", path.display()),
                }),
        }
    }
}

/// Trait for GPU/CPU compute backends.
///
/// `init` is called once; every later call takes `&self` so that scoped
/// resource guards can hold a shared borrow of the backend while the
/// orchestrator keeps issuing calls. All calls block until complete from
/// the host's point of view.
///
/// # Implementations
/// - [`CpuFallback`] — Sequential CPU reference (always available)
/// - `OpenClBackend` — OpenCL device (`opencl` feature)
pub trait ComputeBackend: Send + Sync {
    /// Initialize the backend: select a device and create its queue.
    fn init(&mut self) -> GrafcolorResult<()>;

    /// Returns the backend name (e.g., "cpu_fallback", "opencl").
    fn name(&self) -> &str;

    /// Returns true if work runs on a GPU device.
    fn is_gpu(&self) -> bool;

    /// Build `entry_point` from `source`.
    fn build_kernel(&self, source: &KernelSource, entry_point: &str) -> GrafcolorResult<KernelId>;

    /// Create a buffer of `size_bytes`, optionally initialized from `initial`.
    fn create_buffer(
        &self,
        size_bytes: usize,
        access: BufferAccess,
        initial: Option<&[u8]>,
    ) -> GrafcolorResult<BufferId>;

    /// Overwrite the start of `buffer` with `data`.
    fn write_buffer(&self, buffer: BufferId, data: &[u8]) -> GrafcolorResult<()>;

    /// Bind argument `index` of `kernel`.
    fn set_kernel_arg(&self, kernel: KernelId, index: u32, arg: KernelArg) -> GrafcolorResult<()>;

    /// Enqueue `kernel` over a one-dimensional range of `global_work_size` items.
    fn dispatch(&self, kernel: KernelId, global_work_size: usize) -> GrafcolorResult<()>;

    /// Copy the first `out.len()` bytes of `buffer` to the host.
    fn read_buffer(&self, buffer: BufferId, out: &mut [u8]) -> GrafcolorResult<()>;

    /// Block until all enqueued work is complete.
    fn synchronize(&self) -> GrafcolorResult<()>;

    /// Release a buffer. Unknown handles are ignored.
    fn release_buffer(&self, buffer: BufferId);

    /// Release a kernel and its program. Unknown handles are ignored.
    fn release_kernel(&self, kernel: KernelId);
}

/// Backend call that [`CpuFallback`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Allocation,
    Dispatch,
    Readback,
    Sync,
}

#[derive(Debug)]
pub(crate) struct CpuBuffer {
    pub(crate) data: Vec<u8>,
    pub(crate) access: BufferAccess,
}

#[derive(Debug)]
struct CpuKernel {
    kind: BuiltinKernel,
    args: Vec<Option<KernelArg>>,
}

#[derive(Debug, Default)]
struct CpuState {
    next_handle: u32,
    buffers: HashMap<u32, CpuBuffer>,
    kernels: HashMap<u32, CpuKernel>,
    dispatches: usize,
    /// Successful calls per fault kind, for fault injection.
    calls: HashMap<Fault, usize>,
    fault: Option<(Fault, usize)>,
}

impl CpuState {
    fn handle(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Counts a call of kind `kind`, failing once the injected budget is spent.
    fn check_fault(&mut self, kind: Fault) -> bool {
        let count = self.calls.entry(kind).or_insert(0);
        if let Some((fault, after)) = self.fault {
            if fault == kind && *count >= after {
                return true;
            }
        }
        *count += 1;
        false
    }
}

/// Sequential CPU reference backend.
///
/// Always available, used for:
/// - Machines without an OpenCL device
/// - Correctness validation (device results should match CPU)
/// - Tests, including fault injection on every fallible call kind
///
/// Kernels are resolved by entry-point name; the source text is not
/// compiled. Handle bookkeeping mirrors a real device so leaks show up in
/// [`live_buffers`](CpuFallback::live_buffers).
pub struct CpuFallback {
    initialized: bool,
    state: Mutex<CpuState>,
}

impl CpuFallback {
    /// Creates a new CPU fallback backend.
    pub fn new() -> Self {
        Self {
            initialized: false,
            state: Mutex::new(CpuState::default()),
        }
    }

    /// Creates a backend that fails every call of kind `fault` after
    /// `after` successful ones.
    pub fn with_fault(fault: Fault, after: usize) -> Self {
        let backend = Self::new();
        backend.state().fault = Some((fault, after));
        backend
    }

    fn state(&self) -> MutexGuard<'_, CpuState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_init(&self) -> GrafcolorResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(GrafcolorError::BackendUnavailable(
                "cpu_fallback used before init".into(),
            ))
        }
    }

    /// Number of buffers created and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.state().buffers.len()
    }

    /// Number of kernels built and not yet released.
    pub fn live_kernels(&self) -> usize {
        self.state().kernels.len()
    }

    /// Number of successful kernel dispatches so far.
    pub fn dispatch_count(&self) -> usize {
        self.state().dispatches
    }
}

impl Default for CpuFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuFallback {
    fn init(&mut self) -> GrafcolorResult<()> {
        self.initialized = true;
        tracing::debug!("cpu_fallback initialized");
        Ok(())
    }

    fn name(&self) -> &str {
        "cpu_fallback"
    }

    fn is_gpu(&self) -> bool {
        false
    }

    fn build_kernel(&self, source: &KernelSource, entry_point: &str) -> GrafcolorResult<KernelId> {
        self.ensure_init()?;
        let kind = BuiltinKernel::from_entry_point(entry_point).ok_or_else(|| {
            GrafcolorError::Compile {
                entry_point: entry_point.to_string(),
                log: "no built-in CPU kernel with this entry point".into(),
            }
        })?;
        if let KernelSource::File(path) = source {
            tracing::debug!(path = %path.display(), entry_point, "cpu_fallback ignores kernel source file");
        }

        let mut state = self.state();
        let id = state.handle();
        state.kernels.insert(
            id,
            CpuKernel {
                kind,
                args: vec![None; kind.arity()],
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
        self.ensure_init()?;
        let mut state = self.state();
        if state.check_fault(Fault::Allocation) {
            return Err(GrafcolorError::Allocation(format!(
                "injected failure allocating {size_bytes} bytes"
            )));
        }

        let mut data = vec![0u8; size_bytes];
        if let Some(init) = initial {
            if init.len() > size_bytes {
                return Err(GrafcolorError::Allocation(format!(
                    "initial data ({} bytes) exceeds buffer size ({size_bytes} bytes)",
                    init.len()
                )));
            }
            data[..init.len()].copy_from_slice(init);
        }

        let id = state.handle();
        state.buffers.insert(id, CpuBuffer { data, access });
        Ok(BufferId(id))
    }

    fn write_buffer(&self, buffer: BufferId, data: &[u8]) -> GrafcolorResult<()> {
        self.ensure_init()?;
        let mut state = self.state();
        let target = state
            .buffers
            .get_mut(&buffer.0)
            .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown buffer {}", buffer.0)))?;
        if data.len() > target.data.len() {
            return Err(GrafcolorError::Dispatch(format!(
                "write of {} bytes exceeds buffer size {}",
                data.len(),
                target.data.len()
            )));
        }
        target.data[..data.len()].copy_from_slice(data);
        Ok(())
    }

    fn set_kernel_arg(&self, kernel: KernelId, index: u32, arg: KernelArg) -> GrafcolorResult<()> {
        self.ensure_init()?;
        let mut state = self.state();
        let entry = state
            .kernels
            .get_mut(&kernel.0)
            .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown kernel {}", kernel.0)))?;
        let slot = entry.args.get_mut(index as usize).ok_or_else(|| {
            GrafcolorError::Dispatch(format!(
                "{} takes {} arguments, got index {index}",
                entry.kind.entry_point(),
                entry.kind.arity()
            ))
        })?;
        *slot = Some(arg);
        Ok(())
    }

    fn dispatch(&self, kernel: KernelId, global_work_size: usize) -> GrafcolorResult<()> {
        self.ensure_init()?;
        let mut state = self.state();
        if state.check_fault(Fault::Dispatch) {
            return Err(GrafcolorError::Dispatch("injected dispatch failure".into()));
        }

        let (kind, args) = {
            let entry = state
                .kernels
                .get(&kernel.0)
                .ok_or_else(|| GrafcolorError::Dispatch(format!("unknown kernel {}", kernel.0)))?;
            let args = entry
                .args
                .iter()
                .enumerate()
                .map(|(i, arg)| {
                    arg.ok_or_else(|| {
                        GrafcolorError::Dispatch(format!(
                            "{}: argument {i} not set",
                            entry.kind.entry_point()
                        ))
                    })
                })
                .collect::<GrafcolorResult<Vec<KernelArg>>>()?;
            (entry.kind, args)
        };

        kind.execute(&args, global_work_size, &mut state.buffers)?;
        state.dispatches += 1;
        Ok(())
    }

    fn read_buffer(&self, buffer: BufferId, out: &mut [u8]) -> GrafcolorResult<()> {
        self.ensure_init()?;
        let mut state = self.state();
        if state.check_fault(Fault::Readback) {
            return Err(GrafcolorError::Readback("injected readback failure".into()));
        }
        let source = state
            .buffers
            .get(&buffer.0)
            .ok_or_else(|| GrafcolorError::Readback(format!("unknown buffer {}", buffer.0)))?;
        if out.len() > source.data.len() {
            return Err(GrafcolorError::Readback(format!(
                "read of {} bytes exceeds buffer size {}",
                out.len(),
                source.data.len()
            )));
        }
        out.copy_from_slice(&source.data[..out.len()]);
        Ok(())
    }

    fn synchronize(&self) -> GrafcolorResult<()> {
        self.ensure_init()?;
        if self.state().check_fault(Fault::Sync) {
            return Err(GrafcolorError::Sync("injected synchronization failure".into()));
        }
        Ok(())
    }

    fn release_buffer(&self, buffer: BufferId) {
        self.state().buffers.remove(&buffer.0);
    }

    fn release_kernel(&self, kernel: KernelId) {
        self.state().kernels.remove(&kernel.0);
    }
}

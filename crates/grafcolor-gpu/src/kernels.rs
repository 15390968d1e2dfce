//! Built-in coloring kernels.
//!
//! Host implementations of the two device kernels the orchestrators
//! dispatch. [`CpuFallback`](crate::CpuFallback) runs these sequentially,
//! one loop iteration per work item; the OpenCL sources under `kernels/`
//! implement the same contracts on a device.

use std::collections::HashMap;

use grafcolor_graph::{get_bit, set_bit};
use grafcolor_types::constants::{DEFAULT_LUBY_KERNEL_NAME, DEFAULT_VIS_KERNEL_NAME};
use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::backend::{CpuBuffer, KernelArg};

/// A kernel the CPU backend knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKernel {
    /// `getISSet(adj, priority, candidate, n, in_set)`
    ///
    /// Active vertex `i` joins the independent set iff `(priority[i], i)`
    /// beats `(priority[j], j)` for every active neighbor `j`.
    IndependentSet,
    /// `kernelColor(adj_bits, stream, offsets, stream_len, n, groups_bits, batch_start)`
    ///
    /// Work item `w` greedily grows the vertex independent set of
    /// `v = batch_start + w` from `v`'s non-adjacency group and writes it
    /// into bit-row `w` of `groups_bits`.
    VertexIndependentSet,
}

impl BuiltinKernel {
    /// Resolves a kernel by its entry-point name.
    pub fn from_entry_point(name: &str) -> Option<Self> {
        match name {
            DEFAULT_LUBY_KERNEL_NAME => Some(Self::IndependentSet),
            DEFAULT_VIS_KERNEL_NAME => Some(Self::VertexIndependentSet),
            _ => None,
        }
    }

    /// Entry-point name in the kernel source.
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::IndependentSet => DEFAULT_LUBY_KERNEL_NAME,
            Self::VertexIndependentSet => DEFAULT_VIS_KERNEL_NAME,
        }
    }

    /// Number of kernel arguments.
    pub fn arity(self) -> usize {
        match self {
            Self::IndependentSet => 5,
            Self::VertexIndependentSet => 7,
        }
    }

    /// Index of the argument the kernel writes.
    pub fn output_arg(self) -> usize {
        match self {
            Self::IndependentSet => 4,
            Self::VertexIndependentSet => 5,
        }
    }

    /// Runs the kernel over `global_work_size` work items against host buffers.
    pub(crate) fn execute(
        self,
        args: &[KernelArg],
        global_work_size: usize,
        buffers: &mut HashMap<u32, CpuBuffer>,
    ) -> GrafcolorResult<()> {
        let inputs = Inputs {
            kernel: self,
            args,
            buffers,
        };
        let output_id = inputs.buffer_id(self.output_arg())?;
        let mut output = {
            let target = inputs.buffer(self.output_arg())?;
            if !target.access.kernel_writable() {
                return Err(GrafcolorError::Dispatch(format!(
                    "{}: output argument {} is a read-only buffer",
                    self.entry_point(),
                    self.output_arg()
                )));
            }
            target.data.clone()
        };

        match self {
            Self::IndependentSet => independent_set(&inputs, global_work_size, &mut output)?,
            Self::VertexIndependentSet => {
                vertex_independent_set(&inputs, global_work_size, &mut output)?
            }
        }

        if let Some(target) = buffers.get_mut(&output_id) {
            target.data = output;
        }
        Ok(())
    }
}

/// Read-only view of a dispatch's bound arguments.
struct Inputs<'a> {
    kernel: BuiltinKernel,
    args: &'a [KernelArg],
    buffers: &'a HashMap<u32, CpuBuffer>,
}

impl Inputs<'_> {
    fn error(&self, index: usize, what: &str) -> GrafcolorError {
        GrafcolorError::Dispatch(format!(
            "{}: argument {index} {what}",
            self.kernel.entry_point()
        ))
    }

    fn buffer_id(&self, index: usize) -> GrafcolorResult<u32> {
        match self.args.get(index) {
            Some(KernelArg::Buffer(id)) => Ok(id.0),
            _ => Err(self.error(index, "must be a buffer")),
        }
    }

    fn buffer(&self, index: usize) -> GrafcolorResult<&CpuBuffer> {
        let id = self.buffer_id(index)?;
        self.buffers
            .get(&id)
            .ok_or_else(|| self.error(index, "refers to a released buffer"))
    }

    fn bytes(&self, index: usize) -> GrafcolorResult<&[u8]> {
        Ok(&self.buffer(index)?.data)
    }

    fn words(&self, index: usize) -> GrafcolorResult<Vec<u32>> {
        Ok(bytes_to_words(self.bytes(index)?))
    }

    fn uint(&self, index: usize) -> GrafcolorResult<u32> {
        match self.args.get(index) {
            Some(KernelArg::Uint(value)) => Ok(*value),
            _ => Err(self.error(index, "must be an unsigned integer")),
        }
    }

    /// Fails unless `len` elements fit in the bound argument.
    fn require(&self, index: usize, have: usize, len: usize) -> GrafcolorResult<()> {
        if have < len {
            return Err(self.error(index, &format!("holds {have} elements, need {len}")));
        }
        Ok(())
    }
}

/// Decodes native-endian `u32` words. Trailing bytes are ignored.
pub(crate) fn bytes_to_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn independent_set(
    inputs: &Inputs<'_>,
    global_work_size: usize,
    output: &mut [u8],
) -> GrafcolorResult<()> {
    let adj = inputs.words(0)?;
    let priority = inputs.words(1)?;
    let candidate = inputs.words(2)?;
    let n = inputs.uint(3)? as usize;
    inputs.require(0, adj.len(), n * n)?;
    inputs.require(1, priority.len(), n)?;
    inputs.require(2, candidate.len(), n)?;
    inputs.require(4, output.len() / 4, n)?;

    for i in 0..global_work_size.min(n) {
        let selected = candidate[i] != 0
            && (0..n).all(|j| {
                j == i
                    || adj[i * n + j] == 0
                    || candidate[j] == 0
                    || (priority[i], i) > (priority[j], j)
            });
        output[i * 4..i * 4 + 4].copy_from_slice(&u32::from(selected).to_ne_bytes());
    }
    Ok(())
}

fn vertex_independent_set(
    inputs: &Inputs<'_>,
    global_work_size: usize,
    output: &mut [u8],
) -> GrafcolorResult<()> {
    let adj_bits = inputs.bytes(0)?;
    let stream = inputs.words(1)?;
    let offsets = inputs.words(2)?;
    let stream_len = inputs.uint(3)? as usize;
    let n = inputs.uint(4)? as usize;
    let batch_start = inputs.uint(6)? as usize;
    inputs.require(0, adj_bits.len() * 8, n * n)?;
    inputs.require(1, stream.len(), stream_len)?;
    inputs.require(2, offsets.len(), n)?;

    let adjacent = |a: usize, b: usize| get_bit(adj_bits, a * n + b);
    let mut taken: Vec<usize> = Vec::new();

    for w in 0..global_work_size {
        let v = batch_start + w;
        if v >= n {
            break;
        }
        inputs.require(5, output.len() * 8, (w + 1) * n)?;

        let start = offsets[v] as usize;
        let end = offsets.get(v + 1).map_or(stream_len, |&next| next as usize);
        if start > end || end > stream_len {
            return Err(inputs.error(2, &format!("has a corrupt range for vertex {v}")));
        }

        taken.clear();
        taken.push(v);
        for &member in &stream[start..end] {
            let member = member as usize;
            if member < n && !taken.iter().any(|&t| t == member || adjacent(t, member)) {
                taken.push(member);
            }
        }

        for col in 0..n {
            set_bit(output, w * n + col, false);
        }
        for &t in &taken {
            set_bit(output, w * n + t, true);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_words_ignores_trailing_bytes() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u32.to_ne_bytes());
        bytes.extend_from_slice(&9u32.to_ne_bytes());
        bytes.push(0xff);
        assert_eq!(bytes_to_words(&bytes), vec![7, 9]);
    }

    #[test]
    fn entry_points_resolve() {
        for kernel in [BuiltinKernel::IndependentSet, BuiltinKernel::VertexIndependentSet] {
            assert_eq!(BuiltinKernel::from_entry_point(kernel.entry_point()), Some(kernel));
            assert!(kernel.output_arg() < kernel.arity());
        }
        assert_eq!(BuiltinKernel::from_entry_point("main"), None);
    }
}

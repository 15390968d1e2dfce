//! Non-adjacency group coloring.
//!
//! Three phases:
//!
//! 1. **Group computation** (device). The adjacency bit matrix and the
//!    marshalled non-adjacency stream are uploaded once. The group kernel
//!    then runs in batches of `min(N, batch_cap)` vertices; each batch
//!    fills one bit-row per vertex, and the rows are accumulated into an
//!    N×N group matrix on the host.
//! 2. **Conflict resolution** (host). Groups are visited in ascending
//!    vertex order. A group is accepted and given a fresh color when none
//!    of its members is colored yet and its members are pairwise
//!    non-adjacent; otherwise it is discarded.
//! 3. **Greedy fallback** (host). Every vertex still uncolored takes the
//!    lowest color in `[0, max_degree]` unused by its neighbors.

use std::time::Instant;

use grafcolor_gpu::{BufferAccess, ComputeBackend, DeviceBuffer, DeviceKernel, KernelArg, KernelSource};
use grafcolor_graph::{marshall, BitMatrix, Graph, MarshalledStream};
use grafcolor_telemetry::{EventBus, EventKind};
use grafcolor_types::constants::DEFAULT_VIS_KERNEL_NAME;
use grafcolor_types::GrafcolorResult;

use crate::assignment::ColorAssignment;
use crate::config::{Algorithm, ColoringConfig};
use crate::greedy::ColorMask;
use crate::luby::emit;
use crate::strategy::ColoringOutcome;

/// Group rows are written with 32-bit atomics on devices.
const GROUP_BUFFER_ALIGN: usize = 4;

/// Output of [`compute_groups`].
#[derive(Debug, Clone)]
pub struct GroupMatrix {
    /// Row `v` holds the vertex independent set grown from `v`.
    pub groups: BitMatrix,
    pub batches: u32,
}

/// Output of [`resolve_groups`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Groups that received a color.
    pub accepted: u32,
    /// Groups discarded because a member was already colored.
    pub duplicates: u32,
    /// Groups discarded because two members are adjacent.
    pub conflicting: u32,
}

impl Resolution {
    pub fn rejected(&self) -> u32 {
        self.duplicates + self.conflicting
    }
}

/// Colors `graph` with the non-adjacency group method on `backend`.
///
/// Fails with `EmptyGraph` for a graph without vertices and with the
/// backend's error on any allocation, dispatch, readback or sync
/// failure. Resources acquired before a failure are released.
pub fn color_non_adjacency<B: ComputeBackend + ?Sized>(
    graph: &Graph,
    backend: &B,
    config: &ColoringConfig,
    events: Option<&EventBus>,
) -> GrafcolorResult<ColoringOutcome> {
    config.validate()?;
    let start = Instant::now();
    let adjacency = graph.adjacency_bit_matrix()?;
    let stream = marshall(&graph.non_adjacency_groups()?);
    let n = graph.vertex_count();

    emit(events, 0, EventKind::RunBegin {
        algorithm: Algorithm::NonAdjacency.name().into(),
        backend: backend.name().into(),
        vertices: n as u32,
        edges: graph.edge_count() as u32,
    });
    tracing::info!(
        vertices = n,
        stream = stream.total_size(),
        backend = backend.name(),
        "group coloring started"
    );

    let (source, entry_point) =
        config.kernel_source(KernelSource::vertex_independent_set(), DEFAULT_VIS_KERNEL_NAME);
    let computed = compute_groups(
        backend,
        &source,
        &entry_point,
        &adjacency,
        &stream,
        config.batch_cap,
        events,
    )?;

    let mut assignment = ColorAssignment::new(n);
    let resolution = resolve_groups(&computed.groups, &adjacency, &mut assignment);
    let residual = assignment.uncolored().len();
    emit(events, computed.batches, EventKind::GroupsResolved {
        accepted: resolution.accepted,
        rejected: resolution.rejected(),
        residual: residual as u32,
    });
    tracing::debug!(
        accepted = resolution.accepted,
        duplicates = resolution.duplicates,
        conflicting = resolution.conflicting,
        residual,
        "groups resolved"
    );
    if resolution.conflicting > 0 {
        tracing::warn!(
            conflicting = resolution.conflicting,
            "group kernel produced groups with adjacent members"
        );
    }

    let residual_ids = assignment.uncolored();
    let fallback = greedy_fallback(&adjacency, graph.max_degree(), &mut assignment);
    emit(events, computed.batches, EventKind::FallbackColored {
        vertices: fallback as u32,
        max_color: residual_ids
            .iter()
            .filter_map(|&v| assignment.get(v as usize))
            .max(),
    });

    assignment.validate(graph)?;
    let wall_time = start.elapsed().as_secs_f64();
    emit(events, computed.batches, EventKind::RunComplete {
        colors: assignment.color_count() as u32,
        rounds: computed.batches,
        dispatches: computed.batches,
        wall_time,
    });
    tracing::info!(
        batches = computed.batches,
        colors = assignment.color_count(),
        fallback,
        "group coloring done"
    );

    Ok(ColoringOutcome {
        assignment,
        algorithm: Algorithm::NonAdjacency,
        rounds: computed.batches,
        dispatches: computed.batches,
        group_colors: resolution.accepted,
        fallback_vertices: fallback as u32,
        wall_time,
    })
}

/// Phase 1: runs the group kernel in batches and accumulates the rows.
///
/// Batches hold `min(N, batch_cap)` vertices; the last one may be
/// partial. Run-level inputs are uploaded once, each batch's output
/// buffer lives for that batch only.
pub fn compute_groups<B: ComputeBackend + ?Sized>(
    backend: &B,
    source: &KernelSource,
    entry_point: &str,
    adjacency: &BitMatrix,
    stream: &MarshalledStream,
    batch_cap: usize,
    events: Option<&EventBus>,
) -> GrafcolorResult<GroupMatrix> {
    let n = adjacency.rows();
    let batch = n.min(batch_cap).max(1);

    let kernel = DeviceKernel::build(backend, source, entry_point)?;
    let adj_buf = DeviceBuffer::upload(backend, BufferAccess::ReadOnly, adjacency.as_bytes())?;
    let stream_buf = DeviceBuffer::upload_words(backend, BufferAccess::ReadOnly, stream.flat())?;
    let offsets_buf = DeviceBuffer::upload_words(backend, BufferAccess::ReadOnly, stream.offsets())?;

    let mut groups = BitMatrix::zeroed(n, n);
    let mut batches = 0u32;

    for batch_start in (0..n).step_by(batch) {
        let size = batch.min(n - batch_start);
        let bytes = BitMatrix::byte_len_for(size, n);
        let out_buf = DeviceBuffer::zeroed(
            backend,
            BufferAccess::ReadWrite,
            bytes.next_multiple_of(GROUP_BUFFER_ALIGN),
        )?;

        kernel.set_args(&[
            adj_buf.arg(),
            stream_buf.arg(),
            offsets_buf.arg(),
            KernelArg::Uint(stream.total_size() as u32),
            KernelArg::Uint(n as u32),
            out_buf.arg(),
            KernelArg::Uint(batch_start as u32),
        ])?;
        kernel.dispatch(size)?;

        let rows = BitMatrix::from_bytes(out_buf.read_bytes(bytes)?, size, n)?;
        groups.copy_rows_from(batch_start, &rows);

        emit(events, batches, EventKind::BatchDispatched {
            batch_start: batch_start as u32,
            batch_size: size as u32,
        });
        tracing::debug!(batch = batches, batch_start, size, "group batch read back");
        batches += 1;
    }

    Ok(GroupMatrix { groups, batches })
}

/// Phase 2: host-side conflict resolution.
///
/// Visits groups in ascending vertex order, skipping vertices already
/// colored by an earlier group. A group is discarded if any member is
/// already colored or if two members are adjacent; otherwise every member
/// receives the next color. Colors start after the highest color already
/// in `assignment`.
pub fn resolve_groups(
    groups: &BitMatrix,
    adjacency: &BitMatrix,
    assignment: &mut ColorAssignment,
) -> Resolution {
    let n = groups.rows().min(assignment.len());
    let mut next_color = assignment.max_color().map_or(0, |c| c + 1);
    let mut resolution = Resolution::default();

    for v in 0..n {
        if assignment.is_colored(v) {
            continue;
        }
        let members = groups.row_members(v);
        if members.is_empty() {
            continue;
        }
        if members.iter().any(|&m| assignment.is_colored(m as usize)) {
            resolution.duplicates += 1;
            continue;
        }
        if !is_independent(&members, adjacency) {
            resolution.conflicting += 1;
            continue;
        }
        for &m in &members {
            assignment.set(m as usize, next_color);
        }
        next_color += 1;
        resolution.accepted += 1;
    }
    resolution
}

fn is_independent(members: &[u32], adjacency: &BitMatrix) -> bool {
    members.iter().enumerate().all(|(i, &a)| {
        members[i + 1..]
            .iter()
            .all(|&b| !adjacency.get(a as usize, b as usize))
    })
}

/// Phase 3: sequential greedy fallback.
///
/// Each uncolored vertex, in id order, takes the lowest color in
/// `[0, max_degree]` not used by a colored neighbor; neighbor colors
/// outside that range are ignored. Returns the number of vertices colored.
pub fn greedy_fallback(
    adjacency: &BitMatrix,
    max_degree: usize,
    assignment: &mut ColorAssignment,
) -> usize {
    let n = adjacency.rows().min(assignment.len());
    let mut used = ColorMask::new(max_degree + 1);
    let mut colored = 0;

    for v in 0..n {
        if assignment.is_colored(v) {
            continue;
        }
        used.clear();
        for u in 0..n {
            if adjacency.get(v, u) {
                if let Some(c) = assignment.get(u) {
                    used.mark(c);
                }
            }
        }
        // At most max_degree neighbors, so one palette slot is free.
        let color = used.lowest_free().unwrap_or(max_degree as u32);
        assignment.set(v, color);
        colored += 1;
    }
    colored
}

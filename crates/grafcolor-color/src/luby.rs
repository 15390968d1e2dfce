//! Luby independent-set coloring.
//!
//! Each round uploads fresh random priorities and the candidate flags,
//! dispatches the independent-set kernel over all N vertices, reads back
//! the selection and gives every selected vertex the round's color. A
//! round's selection is independent, so vertices sharing a color are
//! never adjacent. Rounds repeat until no candidate remains.
//!
//! The adjacency matrix and kernel live for the whole run; priority,
//! candidate and output buffers are scoped to their round.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grafcolor_gpu::{BufferAccess, ComputeBackend, DeviceBuffer, DeviceKernel, KernelArg, KernelSource};
use grafcolor_graph::Graph;
use grafcolor_telemetry::{ColoringEvent, EventBus, EventKind};
use grafcolor_types::constants::DEFAULT_LUBY_KERNEL_NAME;
use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::assignment::ColorAssignment;
use crate::config::{Algorithm, ColoringConfig};
use crate::strategy::ColoringOutcome;

/// Colors `graph` with Luby rounds on `backend`.
///
/// Fails with `EmptyGraph` for a graph without vertices, with the
/// backend's error if any allocation, dispatch, readback or sync fails,
/// and with `Dispatch` if the round limit is reached before every vertex
/// is colored. Resources acquired before a failure are released.
pub fn color_luby<B: ComputeBackend + ?Sized>(
    graph: &Graph,
    backend: &B,
    config: &ColoringConfig,
    events: Option<&EventBus>,
) -> GrafcolorResult<ColoringOutcome> {
    config.validate()?;
    let start = Instant::now();
    let adjacency = graph.adjacency_matrix()?;
    let n = adjacency.vertex_count();
    let max_rounds = config.max_rounds.map_or(n + 1, |r| r as usize);

    emit(events, 0, EventKind::RunBegin {
        algorithm: Algorithm::Luby.name().into(),
        backend: backend.name().into(),
        vertices: n as u32,
        edges: graph.edge_count() as u32,
    });
    tracing::info!(vertices = n, backend = backend.name(), "luby coloring started");

    let (source, entry_point) = config.kernel_source(KernelSource::luby(), DEFAULT_LUBY_KERNEL_NAME);
    let kernel = DeviceKernel::build(backend, &source, &entry_point)?;
    let adj_buf = DeviceBuffer::upload_words(backend, BufferAccess::ReadOnly, adjacency.as_slice())?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut assignment = ColorAssignment::new(n);
    let mut candidate = vec![1u32; n];
    let mut remaining = n;
    let mut next_color = 0u32;
    let mut rounds = 0usize;

    while remaining > 0 {
        if rounds >= max_rounds {
            return Err(GrafcolorError::Dispatch(format!(
                "luby did not finish within {max_rounds} rounds, {remaining} vertices uncolored"
            )));
        }

        let priority: Vec<u32> = (0..n).map(|_| rng.gen()).collect();
        let in_set = run_round(backend, &kernel, &adj_buf, &priority, &candidate)?;

        let mut selected = 0usize;
        for (v, flag) in in_set.iter().enumerate() {
            if *flag != 0 && candidate[v] != 0 {
                assignment.set(v, next_color);
                candidate[v] = 0;
                selected += 1;
            }
        }
        remaining -= selected;

        if selected == 0 {
            tracing::warn!(round = rounds, remaining, "luby round selected no vertices");
        } else {
            next_color += 1;
        }
        emit(events, rounds as u32, EventKind::RoundComplete {
            selected: selected as u32,
            remaining: remaining as u32,
        });
        tracing::debug!(round = rounds, selected, remaining, "luby round complete");
        rounds += 1;
    }

    assignment.validate(graph)?;
    let wall_time = start.elapsed().as_secs_f64();
    emit(events, rounds as u32, EventKind::RunComplete {
        colors: assignment.color_count() as u32,
        rounds: rounds as u32,
        dispatches: rounds as u32,
        wall_time,
    });
    tracing::info!(rounds, colors = assignment.color_count(), "luby coloring done");

    Ok(ColoringOutcome {
        assignment,
        algorithm: Algorithm::Luby,
        rounds: rounds as u32,
        dispatches: rounds as u32,
        group_colors: 0,
        fallback_vertices: 0,
        wall_time,
    })
}

/// Runs one independent-set dispatch and returns the per-vertex flags.
fn run_round<B: ComputeBackend + ?Sized>(
    backend: &B,
    kernel: &DeviceKernel<'_, B>,
    adj_buf: &DeviceBuffer<'_, B>,
    priority: &[u32],
    candidate: &[u32],
) -> GrafcolorResult<Vec<u32>> {
    let n = candidate.len();
    let prio_buf = DeviceBuffer::upload_words(backend, BufferAccess::ReadOnly, priority)?;
    let cand_buf = DeviceBuffer::upload_words(backend, BufferAccess::ReadOnly, candidate)?;
    let out_buf = DeviceBuffer::zeroed(backend, BufferAccess::WriteOnly, n * 4)?;

    kernel.set_args(&[
        adj_buf.arg(),
        prio_buf.arg(),
        cand_buf.arg(),
        KernelArg::Uint(n as u32),
        out_buf.arg(),
    ])?;
    kernel.dispatch(n)?;
    out_buf.read_words(n)
}

pub(crate) fn emit(events: Option<&EventBus>, round: u32, kind: EventKind) {
    if let Some(bus) = events {
        bus.emit(ColoringEvent::new(round, kind));
    }
}

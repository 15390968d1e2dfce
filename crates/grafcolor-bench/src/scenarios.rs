//! Benchmark scenarios — procedural graphs for each test case.
//!
//! Four canonical scenarios:
//! 1. **Path** — Sparse, bipartite; 2 colors suffice
//! 2. **Cycle** — Odd cycle; 3 colors needed
//! 3. **Complete** — Clique; every vertex needs its own color
//! 4. **Random** — Seeded random graph at 30% completeness

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use grafcolor_graph::generators::{complete_graph, cycle_graph, path_graph, random_graph};
use grafcolor_graph::Graph;
use grafcolor_types::GrafcolorResult;

/// Seed for the random scenario.
const RANDOM_SEED: u64 = 0x5eed;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    Path,
    Cycle,
    Complete,
    Random,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::Path,
            ScenarioKind::Cycle,
            ScenarioKind::Complete,
            ScenarioKind::Random,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Path => "path",
            ScenarioKind::Cycle => "cycle",
            ScenarioKind::Complete => "complete",
            ScenarioKind::Random => "random",
        }
    }

    /// Looks a scenario up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    pub kind: ScenarioKind,
    pub graph: Graph,
    /// Lower bound on the chromatic number, when known.
    pub min_colors: Option<usize>,
}

impl Scenario {
    /// A path on 256 vertices.
    pub fn path() -> Self {
        Self {
            kind: ScenarioKind::Path,
            graph: path_graph(256),
            min_colors: Some(2),
        }
    }

    /// A cycle on 255 vertices (odd, so not bipartite).
    pub fn cycle() -> Self {
        Self {
            kind: ScenarioKind::Cycle,
            graph: cycle_graph(255),
            min_colors: Some(3),
        }
    }

    /// A clique on 32 vertices.
    pub fn complete() -> Self {
        Self {
            kind: ScenarioKind::Complete,
            graph: complete_graph(32),
            min_colors: Some(32),
        }
    }

    /// A seeded random graph on 200 vertices at 30% completeness.
    pub fn random() -> GrafcolorResult<Self> {
        let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
        Ok(Self {
            kind: ScenarioKind::Random,
            graph: random_graph(200, 0.3, &mut rng)?,
            min_colors: None,
        })
    }

    /// Creates a scenario from its kind.
    pub fn from_kind(kind: ScenarioKind) -> GrafcolorResult<Self> {
        match kind {
            ScenarioKind::Path => Ok(Self::path()),
            ScenarioKind::Cycle => Ok(Self::cycle()),
            ScenarioKind::Complete => Ok(Self::complete()),
            ScenarioKind::Random => Self::random(),
        }
    }
}

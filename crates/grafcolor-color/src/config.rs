//! Coloring configuration.
//!
//! Parameters that control which orchestrator runs and how: batch size
//! for the group kernel, RNG seed and round bound for Luby, and an
//! optional user kernel replacing the embedded one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use grafcolor_gpu::KernelSource;
use grafcolor_types::constants::DEFAULT_BATCH_CAP;
use grafcolor_types::{GrafcolorError, GrafcolorResult};

/// Coloring algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Randomized independent-set extraction on the device.
    Luby,
    /// Non-adjacency groups on the device, resolved on the host.
    NonAdjacency,
    /// First-fit greedy on the host.
    Sequential,
}

impl Algorithm {
    pub fn all() -> &'static [Algorithm] {
        &[Algorithm::Luby, Algorithm::NonAdjacency, Algorithm::Sequential]
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Luby => "luby",
            Algorithm::NonAdjacency => "non_adjacency",
            Algorithm::Sequential => "sequential",
        }
    }

    /// True if the algorithm dispatches kernels.
    pub fn uses_backend(self) -> bool {
        !matches!(self, Algorithm::Sequential)
    }
}

/// A kernel loaded from disk instead of the embedded source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelOverride {
    /// Path to the OpenCL source file.
    pub file: PathBuf,
    /// Entry point inside `file`.
    pub entry_point: String,
}

/// Configuration for a coloring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringConfig {
    pub algorithm: Algorithm,

    /// Maximum vertices per group-kernel dispatch.
    pub batch_cap: usize,

    /// Seed for Luby priorities. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Luby round limit. `None` means vertex count + 1.
    pub max_rounds: Option<u32>,

    /// Kernel replacing the embedded one for the selected algorithm.
    pub kernel: Option<KernelOverride>,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::NonAdjacency,
            batch_cap: DEFAULT_BATCH_CAP,
            seed: None,
            max_rounds: None,
            kernel: None,
        }
    }
}

impl ColoringConfig {
    /// Luby coloring with default parameters.
    pub fn luby() -> Self {
        Self {
            algorithm: Algorithm::Luby,
            ..Default::default()
        }
    }

    /// Group coloring with default parameters.
    pub fn non_adjacency() -> Self {
        Self::default()
    }

    /// Sequential first-fit coloring.
    pub fn sequential() -> Self {
        Self {
            algorithm: Algorithm::Sequential,
            ..Default::default()
        }
    }

    /// Same config with a fixed seed, for reproducible Luby runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> GrafcolorResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GrafcolorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML config file.
    pub fn load(path: &Path) -> GrafcolorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GrafcolorError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> GrafcolorResult<String> {
        toml::to_string(self).map_err(|e| GrafcolorError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> GrafcolorResult<()> {
        if self.batch_cap == 0 {
            return Err(GrafcolorError::InvalidConfig("batch_cap must be at least 1".into()));
        }
        if self.max_rounds == Some(0) {
            return Err(GrafcolorError::InvalidConfig("max_rounds must be at least 1".into()));
        }
        if let Some(kernel) = &self.kernel {
            if kernel.entry_point.is_empty() {
                return Err(GrafcolorError::InvalidConfig(
                    "kernel.entry_point must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// The kernel to build: the override if present, else `default`.
    pub fn kernel_source(&self, default: KernelSource, default_entry: &str) -> (KernelSource, String) {
        match &self.kernel {
            Some(k) => (KernelSource::File(k.file.clone()), k.entry_point.clone()),
            None => (default, default_entry.to_string()),
        }
    }
}

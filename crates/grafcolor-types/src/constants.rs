//! Format constants and run defaults.

/// Bits per byte in the packed bit matrices.
pub const BITS_PER_BYTE: usize = 8;

/// Leading character of a comment line in graph input files.
pub const COMMENT_CHAR: char = '#';

/// Separator between the two vertex names of an edge line.
pub const EDGE_SEPARATOR: char = ',';

/// Maximum number of group rows computed by one group-kernel launch.
pub const DEFAULT_BATCH_CAP: usize = 500;

/// Entry point of the vertex-independent-set group kernel.
pub const DEFAULT_VIS_KERNEL_NAME: &str = "kernelColor";

/// Default source file of the group kernel, relative to the working directory.
pub const DEFAULT_VIS_KERNEL_FILE: &str = "kernels/individualSet.cl";

/// Entry point of the Luby independent-set kernel.
pub const DEFAULT_LUBY_KERNEL_NAME: &str = "getISSet";

/// Default source file of the Luby kernel, relative to the working directory.
pub const DEFAULT_LUBY_KERNEL_FILE: &str = "kernels/lubyColor.cl";

/// Default edge density for generated random graphs.
pub const DEFAULT_COMPLETENESS: f64 = 0.5;

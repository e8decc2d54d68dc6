pub mod diff;
pub mod generate;
pub mod snapshot;
pub mod workspace;

// Re-export all command functions
pub use diff::{DiffArgs, DiffOutcome, OutputFormat, cmd_diff};
pub use generate::{GenerateArgs, GenerateOutcome, cmd_generate};
pub use snapshot::{SnapshotArgs, cmd_snapshot, read_snapshot};
pub use workspace::{LoadedSource, load_database};

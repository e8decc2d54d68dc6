// CLI tests drive the binary against snapshot files

pub mod diff;
pub mod generate;

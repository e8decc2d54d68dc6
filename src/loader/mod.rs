//! Turns introspected database data into the loaded entity tree.

pub mod build;
pub mod structure;

pub use build::build_loaded_catalog;
pub use structure::LoadedStructure;

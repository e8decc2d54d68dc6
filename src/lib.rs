//! Reconciles YAML-declared PostgreSQL schemas with a live database.
//!
//! The configured tree comes from [`schema_loader`], the loaded tree from
//! [`db::introspect`] (or a snapshot) through [`loader`]. [`diff::diff`]
//! compares them, [`plan::plan`] and [`plan::order_fragments`] turn the
//! report into ordered migration units, and [`render`] writes them out.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod diff;
pub mod error;
pub mod loader;
pub mod plan;
pub mod render;
pub mod schema_loader;

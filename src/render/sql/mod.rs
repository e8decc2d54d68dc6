//! Shared SQL rendering functions
//!
//! Every fragment payload is built from these, so a change planned against
//! the configured tree always spells its DDL the same way.

pub mod constraint;
pub mod index;
pub mod objects;
pub mod table;

pub use constraint::{
    render_add_check, render_add_foreign_key, render_add_primary_key, render_add_unique,
    render_drop_constraint,
};
pub use index::{render_create_index, render_drop_index};
pub use table::{render_alter_column, render_create_table};

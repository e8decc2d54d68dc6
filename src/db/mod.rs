//! Everything that talks to PostgreSQL.

pub mod connection;
pub mod introspect;
pub mod normalizer;

pub use connection::{connect_to_database, mask_url_password};
pub use introspect::introspect;
pub use normalizer::PgNormalizer;

// These need a reachable PostgreSQL server; run with
// `cargo test -- --ignored` and DATABASE_URL set.

pub mod introspect;

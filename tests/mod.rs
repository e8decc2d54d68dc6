// Integration tests for pgmend

pub mod cli;
pub mod db;
pub mod diff;
pub mod helpers;
pub mod plan;

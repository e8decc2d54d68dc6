// Differencing engine tests, built on in-memory trees

pub mod properties;
pub mod scenarios;

// Planning and ordering tests, from trees to named migration units

pub mod ordering;
pub mod planner;

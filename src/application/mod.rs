//! Application layer: lifecycle hooks, record services and repository seams.

pub mod behavior;
pub mod error;
pub mod records;
pub mod repos;

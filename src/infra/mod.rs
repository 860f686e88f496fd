//! Infrastructure adapters: storage, input files and telemetry.

pub mod error;
pub mod import;
pub mod memory;
pub mod telemetry;

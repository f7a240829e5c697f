//! # Engine Module
//!
//! Stateful orchestration around the external G4beamline engine.
//!
//! - **Lattice Assembly** ([`lattice`]) - validates element configurations and writes the
//!   lattice file in the order the engine's command language requires
//! - **Execution** ([`runner`]) - runs the engine binary against a built lattice
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events
//! - **Error Handling** ([`error`]) - the engine-level error type

pub mod error;
pub mod lattice;
pub mod progress;
pub mod runner;

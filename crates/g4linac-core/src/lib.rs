//! # g4linac Core Library
//!
//! Builds G4beamline lattice decks for linac cooling studies, generates the initial
//! particle ensemble, runs the engine, and extracts time/energy distributions from its
//! output.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Typed configuration sections, lattice elements that
//!   serialize themselves into deck fragments, particle records, and file I/O.
//!
//! - **[`engine`]: The Orchestration Layer.** Assembles elements into an ordered lattice
//!   file and runs the external engine binary against it.
//!
//! - **[`workflows`]: The Public API.** End-to-end build/run and analysis procedures with
//!   progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;

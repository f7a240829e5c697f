//! # Core Module
//!
//! Stateless building blocks for describing a linac lattice to the G4beamline engine.
//!
//! - **Configuration** ([`section`]) - typed key/value sections with per-field coercion
//! - **Lattice Elements** ([`elements`]) - reference particle, beam, and RF cavities
//! - **Particles** ([`particle`], [`species`]) - particle records and species masses
//! - **File I/O** ([`io`]) - track-file output and for009 input

pub mod elements;
pub mod io;
pub mod particle;
pub mod section;
pub mod species;

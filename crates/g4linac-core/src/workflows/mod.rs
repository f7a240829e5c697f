//! # Workflows Module
//!
//! End-to-end entry points tying the [`engine`](crate::engine) and
//! [`core`](crate::core) layers together.
//!
//! - **Simulation** ([`simulate`]) - build the lattice, then run the engine on it
//! - **Analysis** ([`analyze`]) - extract time/energy distributions from engine output

pub mod analyze;
pub mod simulate;

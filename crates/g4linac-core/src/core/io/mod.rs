//! Readers and writers for the engine's particle file formats.
//!
//! Initial ensembles go to the engine as BLTrackFiles ([`bltrack`]); the z-sampled
//! output of a run comes back in ICOOL for009 layout ([`for009`]). Writers share the
//! [`traits::TrackFile`] interface.

pub mod bltrack;
pub mod for009;
pub mod traits;

//! Lattice elements that serialize themselves into deck fragments.
//!
//! - [`reference::Reference`] - the nominal particle (`reference` command)
//! - [`beam::BeamSpec`] - the initial ensemble and its track file (`beam` command)
//! - [`cavity::Cavity`] - one pillbox RF cavity (`pillbox` + `place` commands)

pub mod beam;
pub mod cavity;
pub mod reference;

use phf::{Map, phf_map};

/// Looks up the rest mass [MeV/c^2] of a PDG species id.
///
/// Builders take this as a plain function so tests can substitute a fixed table.
pub type MassLookup = fn(i32) -> Option<f64>;

/// Rest masses keyed by the absolute PDG id, in MeV/c^2 (PDG 2022 values).
static PDG_MASSES: Map<u32, f64> = phf_map! {
    11u32 => 0.51099895,
    13u32 => 105.6583755,
    111u32 => 134.9768,
    211u32 => 139.57039,
    321u32 => 493.677,
    2112u32 => 939.56542052,
    2212u32 => 938.27208816,
};

/// Default [`MassLookup`]: antiparticles share the mass of their partner.
pub fn pdg_mass(pid: i32) -> Option<f64> {
    PDG_MASSES.get(&pid.unsigned_abs()).copied()
}

/// Maps an ICOOL particle type (as written in for009 files) to a PDG id.
///
/// ICOOL uses positive types for the positive-charge member of each pair.
pub fn icool_to_pdg(icool_type: i32) -> Option<i32> {
    let pdg = match icool_type {
        1 => -11,
        -1 => 11,
        2 => -13,
        -2 => 13,
        3 => 211,
        -3 => -211,
        4 => 321,
        -4 => -321,
        5 => 2212,
        -5 => -2212,
        _ => return None,
    };
    Some(pdg)
}

/// Longitudinal momentum of an on-axis particle with the given total energy.
pub fn momentum_from_energy(total_energy: f64, mass: f64) -> f64 {
    (total_energy * total_energy - mass * mass).max(0.0).sqrt()
}

/// Kinetic energy of a particle with the given momentum magnitude.
pub fn kinetic_from_momentum(momentum: f64, mass: f64) -> f64 {
    (momentum * momentum + mass * mass).sqrt() - mass
}

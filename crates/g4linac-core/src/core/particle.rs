use super::species::momentum_from_energy;

/// One initial particle handed to the engine through the track file.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pid: i32,
    pub mass: f64,         // MeV/c^2
    pub energy: f64,       // total energy, MeV
    pub t: f64,            // ns
    pub event_number: u64, // 1-based, in generation order
}

impl Particle {
    pub fn kinetic_energy(&self) -> f64 {
        self.energy - self.mass
    }

    /// Momentum along z for an on-axis particle on the mass shell.
    pub fn pz(&self) -> f64 {
        momentum_from_energy(self.energy, self.mass)
    }
}

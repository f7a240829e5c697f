use g4linac::engine::lattice::LatticeConfiguration;
use std::path::PathBuf;

pub struct AppConfig {
    pub deck_path: PathBuf,
    pub lattice: LatticeConfiguration,
}

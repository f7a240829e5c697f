use std::path::PathBuf;

pub const ENGINE_ENV_VAR: &str = "G4BL_PATH";

pub struct DefaultsConfig {
    pub lattice_filename: PathBuf,
    pub engine_path: PathBuf,
    pub csv_filename: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let engine_path = match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join("Software/install/bin/g4bl"),
            None => PathBuf::from("g4bl"),
        };
        Self {
            lattice_filename: PathBuf::from("output/linac.g4bl"),
            engine_path,
            csv_filename: "time_energy.csv",
        }
    }
}

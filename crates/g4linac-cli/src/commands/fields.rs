use crate::error::Result;
use g4linac::core::elements::beam::BeamSpec;
use g4linac::core::elements::cavity::Cavity;
use g4linac::core::elements::reference::Reference;
use g4linac::core::section::{FieldSpec, Section};
use g4linac::engine::lattice::LatticeConfiguration;

const GRID_KEYS: &[&str] = &["t_min", "t_max", "n_t_steps", "e_min", "e_max", "n_e_steps"];

pub fn run() -> Result<()> {
    print!("{}", render());
    Ok(())
}

fn render() -> String {
    let mut out = String::new();
    out.push_str(&render_section("[lattice]", LatticeConfiguration::FIELDS));
    out.push_str(&render_section("[reference]", Reference::FIELDS));
    out.push_str(&render_section("[beam]", BeamSpec::FIELDS));
    out.push_str("\n[[beam.beams]] type = \"longitudinal_grid\"\n");
    for key in GRID_KEYS {
        out.push_str(&format!("  {key}\n"));
    }
    out.push_str(&render_section("[[cavities]]", Cavity::FIELDS));
    out
}

fn render_section(header: &str, fields: &[FieldSpec]) -> String {
    let mut out = format!("\n{header}\n");
    for spec in fields {
        out.push_str(&format!("  {:<18} {}\n", spec.name, spec.kind));
    }
    out
}

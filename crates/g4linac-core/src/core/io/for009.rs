use crate::core::species::{icool_to_pdg, kinetic_from_momentum, pdg_mass};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const HEADER_LINES: usize = 3;
const MIN_COLUMNS: usize = 12;
const WEIGHT_COLUMN: usize = 15;

const SECONDS_TO_NS: f64 = 1.0e9;
const METRES_TO_MM: f64 = 1.0e3;
const GEV_TO_MEV: f64 = 1.0e3;

#[derive(Debug, Error)]
pub enum For009Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Line {line}: unknown ICOOL particle type {icool_type}")]
    UnknownParticle { line: usize, icool_type: i32 },
}

/// One particle crossing of a z plane, converted to mm / ns / MeV.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub event_number: i64,
    pub pid: i32,
    pub station: i64,
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub mass: f64,
    pub weight: f64,
}

impl Hit {
    pub fn momentum(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    pub fn kinetic_energy(&self) -> f64 {
        kinetic_from_momentum(self.momentum(), self.mass)
    }
}

/// Reads hits from an ICOOL for009 stream, skipping the three header lines.
pub fn read_from(reader: &mut impl BufRead) -> Result<Vec<Hit>, For009Error> {
    let mut hits = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = index + 1;
        if index < HEADER_LINES || line.trim().is_empty() {
            continue;
        }
        hits.push(parse_row(&line, line_num)?);
    }
    Ok(hits)
}

pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Hit>, For009Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader)
}

fn parse_row(line: &str, line_num: usize) -> Result<Hit, For009Error> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < MIN_COLUMNS {
        return Err(For009Error::Parse {
            line: line_num,
            message: format!(
                "expected at least {MIN_COLUMNS} columns, found {}",
                cols.len()
            ),
        });
    }

    let int = |i: usize, name: &str| -> Result<i64, For009Error> {
        cols[i].parse::<i64>().map_err(|_| For009Error::Parse {
            line: line_num,
            message: format!("invalid integer for {name}: '{}'", cols[i]),
        })
    };
    let float = |i: usize, name: &str| -> Result<f64, For009Error> {
        cols[i].parse::<f64>().map_err(|_| For009Error::Parse {
            line: line_num,
            message: format!("invalid number for {name}: '{}'", cols[i]),
        })
    };

    let icool_type = i32::try_from(int(2, "typ")?).map_err(|_| For009Error::Parse {
        line: line_num,
        message: format!("particle type out of range: '{}'", cols[2]),
    })?;
    let pid = icool_to_pdg(icool_type).ok_or(For009Error::UnknownParticle {
        line: line_num,
        icool_type,
    })?;
    let mass = pdg_mass(pid).ok_or(For009Error::UnknownParticle {
        line: line_num,
        icool_type,
    })?;
    let weight = if cols.len() > WEIGHT_COLUMN {
        float(WEIGHT_COLUMN, "wt")?
    } else {
        1.0
    };

    Ok(Hit {
        event_number: int(0, "evt")?,
        pid,
        station: int(4, "reg")?,
        t: float(5, "t")? * SECONDS_TO_NS,
        x: float(6, "x")? * METRES_TO_MM,
        y: float(7, "y")? * METRES_TO_MM,
        z: float(8, "z")? * METRES_TO_MM,
        px: float(9, "Px")? * GEV_TO_MEV,
        py: float(10, "Py")? * GEV_TO_MEV,
        pz: float(11, "Pz")? * GEV_TO_MEV,
        mass,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
#cooling_monitor
# units = [s] [m] [GeV/c] [T] [V/m]
evt par typ flg reg time x y z Px Py Pz Bx By Bz wt Ex Ey Ez arclength polX polY polZ
1 1 2 0 0 1.0e-9 0.0 0.0 1.0 0.0 0.0 0.205035591727 0 0 0 0.5 0 0 0 0 0 0 0
2 1 2 0 0 2.0e-9 0.0 0.0 1.0 0.0 0.0 0.2 0 0 0 1.0 0 0 0 0 0 0 0
";

    #[test]
    fn read_from_converts_units_and_species() {
        let hits = read_from(&mut Cursor::new(SAMPLE)).unwrap();
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.event_number, 1);
        assert_eq!(first.pid, -13);
        assert!((first.t - 1.0).abs() < 1e-12);
        assert!((first.z - 1000.0).abs() < 1e-9);
        assert!((first.pz - 205.035591727).abs() < 1e-9);
        assert!((first.kinetic_energy() - 125.0).abs() < 1e-6);
        assert_eq!(first.weight, 0.5);
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let text = "h1\nh2\nh3\n1 1 2 0 0 1.0\n";
        let err = read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, For009Error::Parse { line: 4, .. }));
    }

    #[test]
    fn unknown_particle_type_is_reported() {
        let text = "h1\nh2\nh3\n1 1 9 0 0 0 0 0 0 0 0 0\n";
        let err = read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            For009Error::UnknownParticle {
                line: 4,
                icool_type: 9
            }
        ));
    }

    #[test]
    fn oversized_particle_type_is_a_parse_error() {
        let text = "h1\nh2\nh3\n1 1 4294967298 0 0 0 0 0 0 0 0 0.1\n";
        let err = read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, For009Error::Parse { line: 4, .. }));
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let text = "h1\nh2\nh3\n1 1 2 0 0 0 0 0 0 0 0 0.1\n";
        let hits = read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(hits[0].weight, 1.0);
    }
}

use crate::core::io::for009::{self, Hit};
use crate::engine::error::EngineError;
use crate::engine::lattice::LatticeConfiguration;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Hits recorded at the same output station, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bunch {
    pub station: i64,
    pub z: f64, // mm, of the first hit
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEnergyPoint {
    pub z_mm: f64,
    pub event: i64,
    pub delta_t_ns: f64,
    pub kinetic_energy_mev: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub source: PathBuf,
    pub csv_path: PathBuf,
    pub bunch_count: usize,
    pub first_z: f64,
    pub last_z: f64,
}

/// Groups hits by station (the for009 `reg` column), in ascending station order.
pub fn group_by_station(hits: Vec<Hit>) -> Vec<Bunch> {
    let mut stations: BTreeMap<i64, Bunch> = BTreeMap::new();
    for hit in hits {
        stations
            .entry(hit.station)
            .or_insert_with(|| Bunch {
                station: hit.station,
                z: hit.z,
                hits: Vec::new(),
            })
            .hits
            .push(hit);
    }
    stations.into_values().collect()
}

/// Time (relative to the bunch's second hit) and kinetic energy of every hit.
///
/// The first hit is the reference particle in engine output, so offsets are measured
/// from the first beam particle; a single-hit bunch falls back to that hit.
pub fn time_energy(bunch: &Bunch) -> Vec<TimeEnergyPoint> {
    let Some(origin) = bunch.hits.get(1).or(bunch.hits.first()) else {
        return Vec::new();
    };
    let t0 = origin.t;
    bunch
        .hits
        .iter()
        .map(|hit| TimeEnergyPoint {
            z_mm: bunch.z,
            event: hit.event_number,
            delta_t_ns: hit.t - t0,
            kinetic_energy_mev: hit.kinetic_energy(),
        })
        .collect()
}

pub fn write_csv(points: &[TimeEnergyPoint], writer: impl Write) -> Result<(), EngineError> {
    let mut csv = csv::Writer::from_writer(writer);
    for point in points {
        csv.serialize(point)?;
    }
    csv.flush()?;
    Ok(())
}

/// Reads the engine output of `lattice` and writes the time/energy distribution of the
/// first and last z planes to `csv_path`.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(lattice: &LatticeConfiguration, csv_path: &Path) -> Result<AnalysisSummary, EngineError> {
    let source = lattice.output_path()?;
    info!("Loading engine output from {:?}", &source);
    let hits = for009::read_from_path(&source).map_err(|e| EngineError::Output {
        path: source.clone(),
        source: e,
    })?;

    let bunches = group_by_station(hits);
    let (Some(first), Some(last)) = (bunches.first(), bunches.last()) else {
        return Err(EngineError::Analysis(format!(
            "no particle records in {}",
            source.display()
        )));
    };

    let mut points = time_energy(first);
    if bunches.len() > 1 {
        points.extend(time_energy(last));
    }

    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_csv(&points, std::fs::File::create(csv_path)?)?;
    info!(
        "Wrote {} time/energy point(s) from z={} mm and z={} mm to {:?}",
        points.len(),
        first.z,
        last.z,
        csv_path
    );

    Ok(AnalysisSummary {
        source,
        csv_path: csv_path.to_path_buf(),
        bunch_count: bunches.len(),
        first_z: first.z,
        last_z: last.z,
    })
}

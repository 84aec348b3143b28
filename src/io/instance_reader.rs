use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use crate::io::{Instance, Trip};
use crate::problem::travel_matrix::{
    FixSizedTravelMatrix, FixSizedTravelMatrixBuilder, TravelMatrix,
};
use crate::problem::Arc;

mod toml {
    use std::fs::File;
    use std::io::Read;

    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Config {
        pub instance: Instance,
        pub requests: Requests,
        pub distance_matrix: DistanceMatrix,
    }

    #[derive(Debug, Deserialize)]
    pub struct Instance {
        pub name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Requests {
        pub num_requests: usize,
        pub csv: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct DistanceMatrix {
        pub num_points: usize,
        pub csv: String,
    }

    pub fn read_config(path: impl Into<String>) -> anyhow::Result<Config> {
        let mut s = String::new();
        File::open(path.into())?.read_to_string(&mut s)?;
        Ok(toml::from_str(s.as_str())?)
    }
}

fn is_header_or_blank(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("from")
}

pub fn read_trips(directory: &Path, config: toml::Requests) -> anyhow::Result<Vec<Trip>> {
    let path = directory.join(&config.csv);
    let file = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut trips = Vec::with_capacity(config.num_requests);
    for next_line in reader.lines() {
        let line = next_line?;
        let trimed_line = line.trim();
        if is_header_or_blank(trimed_line) {
            continue;
        }
        // from,to,submit_time
        let mut split = trimed_line.split(',');
        let from = split
            .next()
            .context("expected next split: from")?
            .trim()
            .parse::<usize>()?;
        let to = split
            .next()
            .context("expected next split: to")?
            .trim()
            .parse::<usize>()?;
        let submit_time = split
            .next()
            .context("expected next split: submit_time")?
            .trim()
            .parse::<i64>()?;
        trips.push(Trip {
            from,
            to,
            submit_time,
        });
    }
    if trips.len() != config.num_requests {
        warn!(
            "expected {} requests, read {} from {}",
            config.num_requests,
            trips.len(),
            config.csv
        );
    }
    Ok(trips)
}

/// Reads `from,to,distance,time` rows; pairs without a row stay unreachable.
pub fn read_travel_matrix(
    directory: &Path,
    config: toml::DistanceMatrix,
) -> anyhow::Result<FixSizedTravelMatrix> {
    let path = directory.join(&config.csv);
    let file = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut travel_matrix_builder = FixSizedTravelMatrixBuilder::with_num_points(config.num_points);
    for (line_no, next_line) in reader.lines().enumerate() {
        let line = next_line?;
        let trimed_line = line.trim();
        if is_header_or_blank(trimed_line) {
            continue;
        }
        // 0,21,2.5,34
        let mut split = trimed_line.split(',');
        let from = split
            .next()
            .context("expected next split: from")?
            .trim()
            .parse::<usize>()?;
        let to = split
            .next()
            .context("expected next split: to")?
            .trim()
            .parse::<usize>()?;
        let distance = split
            .next()
            .context("expected next split: distance")?
            .trim()
            .parse::<f64>()?;
        let time = split
            .next()
            .context("expected next split: time")?
            .trim()
            .parse::<f64>()?;
        travel_matrix_builder
            .set_arc(Arc {
                from,
                to,
                distance,
                time,
            })
            .with_context(|| format!("line {}", line_no + 1))?;
    }
    Ok(travel_matrix_builder.build())
}

/// Loads an instance manifest; csv paths are relative to the manifest's directory.
pub fn load_instance(toml_path: impl Into<String>) -> anyhow::Result<Instance> {
    let toml_path = toml_path.into();
    let config = toml::read_config(toml_path.clone())
        .with_context(|| format!("cannot read instance manifest {}", toml_path))?;
    let path = Path::new(toml_path.as_str());
    let name = match config.instance.name {
        Some(name) => name,
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default(),
    };
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    let trips = read_trips(directory, config.requests)?;
    let matrix = read_travel_matrix(directory, config.distance_matrix)?;
    info!(
        "loaded instance {} ({} trips, {} points)",
        name,
        trips.len(),
        matrix.num_points()
    );

    Ok(Instance {
        name,
        matrix,
        trips,
    })
}

use anyhow::ensure;
use rand::Rng;

use crate::io::{Instance, Trip};
use crate::problem::travel_matrix::FixSizedTravelMatrix;
use crate::problem::{Time, DEFAULT_SPEED};
use crate::utils::Random;

/// trips are not submitted within the last seconds of an epoch
pub const STAY_TIME: Time = 10;

#[derive(Clone, Debug)]
pub struct GeneratorParameters {
    pub num_points: usize,
    pub num_requests: usize,
    pub epoch_duration: Time,
    /// side length of the square the points are placed on
    pub area: f64,
    pub speed: f64,
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            num_points: 20,
            num_requests: 10,
            epoch_duration: 3600,
            area: 1000.0,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Random points on a square with straight-line distances, and trips between distinct points.
pub fn generate_instance(
    params: &GeneratorParameters,
    rng: &mut Random,
) -> anyhow::Result<Instance> {
    ensure!(
        params.num_points >= 2,
        "at least two points are required (got {})",
        params.num_points
    );
    ensure!(
        params.epoch_duration >= STAY_TIME,
        "epoch duration must be at least {} (got {})",
        STAY_TIME,
        params.epoch_duration
    );
    ensure!(
        params.area > 0.0 && params.speed > 0.0,
        "area and speed must be positive"
    );

    let coords: Vec<(f64, f64)> = (0..params.num_points)
        .map(|_| (rng.gen_range(0.0..params.area), rng.gen_range(0.0..params.area)))
        .collect();
    let matrix = FixSizedTravelMatrix::with_euclidean_distances(&coords, params.speed);

    let trips = (0..params.num_requests)
        .map(|_| {
            let from = rng.gen_range(0..params.num_points);
            let mut to = rng.gen_range(0..params.num_points);
            while to == from {
                to = rng.gen_range(0..params.num_points);
            }
            Trip {
                from,
                to,
                submit_time: rng.gen_range(0..=params.epoch_duration - STAY_TIME),
            }
        })
        .collect();

    Ok(Instance {
        name: format!(
            "random-p{}-r{}-e{}",
            params.num_points, params.num_requests, params.epoch_duration
        ),
        matrix,
        trips,
    })
}

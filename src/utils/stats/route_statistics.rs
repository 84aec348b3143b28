use std::time::{Duration, Instant};

use serde::Serialize;

use crate::problem::Value;
use crate::solution::Route;
use crate::utils::DecompositionTracker;

#[derive(Clone, Debug, Serialize)]
pub struct RouteTrackingInfo {
    pub when: Duration,
    pub num_fulfilled: usize,
    pub num_shared_rides: usize,
    pub value: Value,
    pub remaining_candidates: usize,
}

/// Aggregates the routes reported by the decomposition.
#[derive(Debug, Serialize)]
pub struct RouteStatistics {
    #[serde(skip)]
    init_instant: Instant,
    pub num_routes: usize,
    pub num_fulfilled: usize,
    pub num_shared_rides: usize,
    pub total_value: Value,
    pub routes: Vec<RouteTrackingInfo>,
}

impl RouteStatistics {
    pub fn new() -> Self {
        Self {
            init_instant: Instant::now(),
            num_routes: 0,
            num_fulfilled: 0,
            num_shared_rides: 0,
            total_value: 0,
            routes: vec![],
        }
    }

    /// Candidates (originals and variants) left after the last reported route.
    pub fn remaining_candidates(&self) -> Option<usize> {
        self.routes.last().map(|info| info.remaining_candidates)
    }
}

impl Default for RouteStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompositionTracker for RouteStatistics {
    fn route_found(&mut self, route: &Route, remaining_candidates: usize) {
        let info = RouteTrackingInfo {
            when: self.init_instant.elapsed(),
            num_fulfilled: route.fulfilled.len(),
            num_shared_rides: route.number_of_shared_rides(),
            value: route.total_value,
            remaining_candidates,
        };
        self.num_routes += 1;
        self.num_fulfilled += info.num_fulfilled;
        self.num_shared_rides += info.num_shared_rides;
        self.total_value += info.value;
        self.routes.push(info);
    }
}

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problem::catalog::{MaxDelay, RequestCatalog, RequestCatalogBuilder};
use crate::problem::request::RequestIdAllocator;
use crate::problem::travel_matrix::FixSizedTravelMatrix;
use crate::problem::{Point, Time};

pub mod generator;
pub mod instance_reader;
pub mod route_writer;

/// A trip as submitted by a customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub from: Point,
    pub to: Point,
    pub submit_time: Time,
}

pub struct Instance {
    pub name: String,
    pub matrix: FixSizedTravelMatrix,
    pub trips: Vec<Trip>,
}

impl Instance {
    /// Creates the requests of all trips, in file order.
    pub fn build_catalog(&self, max_delay: Option<&MaxDelay>) -> Result<RequestCatalog> {
        let mut allocator = RequestIdAllocator::new();
        let mut builder = RequestCatalogBuilder::new(&self.matrix, &mut allocator);
        if let Some(delay) = max_delay {
            builder.max_delay(delay.call_to_start, delay.realistic_time, delay.late_time);
        }
        for trip in &self.trips {
            builder.add_trip(trip.from, trip.to, trip.submit_time)?;
        }
        builder.build()
    }
}

pub fn load_instance(path: impl Into<String>) -> anyhow::Result<Instance> {
    instance_reader::load_instance(path)
}

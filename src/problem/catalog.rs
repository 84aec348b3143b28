use fixedbitset::FixedBitSet;
use log::warn;

use crate::error::{OptimizerError, Result};
use crate::problem::request::{
    Request, RequestIdAllocator, CALL_TO_START, DEFAULT_LATE_TIME, DEFAULT_REALISTIC_TIME,
};
use crate::problem::travel_matrix::TravelMatrix;
use crate::problem::{Point, RequestId, Time};

/// Immutable set of original requests of one scheduling epoch; ids are dense (`0..len`).
#[derive(Debug, Clone, Default)]
pub struct RequestCatalog {
    requests: Vec<Request>,
}

impl RequestCatalog {
    pub fn from_requests(requests: Vec<Request>) -> Result<Self> {
        let mut seen = FixedBitSet::with_capacity(requests.len());
        for request in &requests {
            if request.id >= requests.len() {
                return Err(OptimizerError::InvalidCatalog(format!(
                    "request id {} is outside of 0..{}",
                    request.id,
                    requests.len()
                )));
            }
            if seen.put(request.id) {
                return Err(OptimizerError::InvalidCatalog(format!(
                    "request id {} is used more than once",
                    request.id
                )));
            }
            if request.is_variant() {
                return Err(OptimizerError::InvalidCatalog(format!(
                    "request {} is a shared-ride variant",
                    request.id
                )));
            }
            request.validate()?;
        }
        Ok(Self { requests })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.iter().find(|request| request.id == id)
    }

    /// Copy of all requests, ordered ascending by latest finish time (stable).
    pub fn sorted_by_latest_finish(&self) -> Vec<Request> {
        let mut sorted = self.requests.clone();
        sorted.sort_by_key(|request| request.latest_finish_time);
        sorted
    }
}

/// Parameters of [`Request::set_max_delay`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaxDelay {
    pub call_to_start: Time,
    pub realistic_time: f64,
    pub late_time: f64,
}

impl Default for MaxDelay {
    fn default() -> Self {
        Self {
            call_to_start: CALL_TO_START,
            realistic_time: DEFAULT_REALISTIC_TIME,
            late_time: DEFAULT_LATE_TIME,
        }
    }
}

/// Creates the requests of an epoch from trips, looking up their distance and travel time.
pub struct RequestCatalogBuilder<'a, M: TravelMatrix> {
    matrix: &'a M,
    allocator: &'a mut RequestIdAllocator,
    requests: Vec<Request>,
    max_delay: Option<MaxDelay>,
}

impl<'a, M: TravelMatrix> RequestCatalogBuilder<'a, M> {
    pub fn new(matrix: &'a M, allocator: &'a mut RequestIdAllocator) -> Self {
        Self {
            matrix,
            allocator,
            requests: vec![],
            max_delay: None,
        }
    }

    /// Applies [`Request::set_max_delay`] to every request on [`Self::build`].
    pub fn max_delay(
        &mut self,
        call_to_start: Time,
        realistic_time: f64,
        late_time: f64,
    ) -> &mut Self {
        self.max_delay = Some(MaxDelay {
            call_to_start,
            realistic_time,
            late_time,
        });
        self
    }

    pub fn add_trip(&mut self, from: Point, to: Point, submit_time: Time) -> Result<RequestId> {
        let arc = self
            .matrix
            .arc(from, to)
            .ok_or(OptimizerError::UnreachableTrip { from, to })?;
        if from == to {
            warn!("trip submitted at {} starts and ends at point {}", submit_time, from);
        }
        let id = self.allocator.next_id();
        self.requests.push(Request::new(
            id,
            from,
            to,
            submit_time,
            arc.distance,
            arc.time as Time,
        ));
        Ok(id)
    }

    pub fn build(&mut self) -> Result<RequestCatalog> {
        let mut requests = std::mem::take(&mut self.requests);
        if let Some(delay) = &self.max_delay {
            for request in requests.iter_mut() {
                request.set_max_delay(delay.call_to_start, delay.realistic_time, delay.late_time);
            }
        }
        RequestCatalog::from_requests(requests)
    }
}

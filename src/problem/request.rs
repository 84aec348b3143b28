use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

use crate::error::{OptimizerError, Result};
use crate::problem::{dist_to_value, Point, RequestId, Time, Value};

pub const MINUTE: Time = 60;

/// default delay between submitting a request and the expected pickup
pub const CALL_TO_START: Time = MINUTE * 15;

pub const DEFAULT_LATENESS: f64 = 2.0;

pub const DEFAULT_REALISTIC_TIME: f64 = 2.0;
pub const DEFAULT_LATE_TIME: f64 = 1.25;

/// Pickup/drop-off events of one scheduled job: `[id, id]` for a single request, four entries for
/// a shared ride.
pub type ReservationOrder = ArrayVec<[RequestId; 4]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub from_point: Point,
    pub to_point: Point,
    pub submit_time: Time,
    pub expected_start_time: Time,
    pub expected_finish_time: Time,
    pub latest_finish_time: Time,
    pub calculated_distance: f64,
    pub calculated_time: Time,
    pub value: Value,
    /// original requests merged into this variant
    pub contains: Option<(RequestId, RequestId)>,
    pub path: Option<Vec<Point>>,
    pub reservation_order: Option<ReservationOrder>,
}

impl Request {
    pub fn new(
        id: RequestId,
        from_point: Point,
        to_point: Point,
        submit_time: Time,
        calculated_distance: f64,
        calculated_time: Time,
    ) -> Self {
        let expected_start_time = submit_time + CALL_TO_START;
        let gross_tt = (calculated_time as f64 * DEFAULT_LATENESS) as Time;
        Self {
            id,
            from_point,
            to_point,
            submit_time,
            expected_start_time,
            expected_finish_time: expected_start_time + calculated_time,
            latest_finish_time: expected_start_time + gross_tt,
            calculated_distance,
            calculated_time,
            value: dist_to_value(calculated_distance),
            contains: None,
            path: None,
            reservation_order: None,
        }
    }

    /// Re-derives the time window from the submit time.
    ///
    /// `realistic_time` stretches the calculated travel time to the expected trip duration,
    /// `late_time` stretches that duration once more to the latest tolerable finish.
    pub fn set_max_delay(&mut self, call_to_start: Time, realistic_time: f64, late_time: f64) {
        self.expected_start_time = self.submit_time + call_to_start;

        let gross_tt = (self.calculated_time as f64 * realistic_time) as Time;
        let later_tt = (gross_tt as f64 * late_time) as Time;
        self.expected_finish_time = self.expected_start_time + gross_tt;
        self.latest_finish_time = self.expected_start_time + later_tt;
    }

    pub fn is_variant(&self) -> bool {
        self.contains.is_some()
    }

    /// Pickup/drop-off events this job contributes when it is scheduled as a whole.
    pub fn reservations(&self) -> ReservationOrder {
        match &self.reservation_order {
            Some(order) => order.clone(),
            None => single_reservation(self.id),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| OptimizerError::InvalidRequest {
            id: self.id,
            reason,
        };
        if self.submit_time >= self.expected_start_time {
            return Err(invalid(format!(
                "submit time {} is not before the expected start {}",
                self.submit_time, self.expected_start_time
            )));
        }
        if self.expected_start_time > self.expected_finish_time {
            return Err(invalid(format!(
                "expected start {} is after the expected finish {}",
                self.expected_start_time, self.expected_finish_time
            )));
        }
        if self.expected_finish_time > self.latest_finish_time {
            return Err(invalid(format!(
                "expected finish {} is after the latest finish {}",
                self.expected_finish_time, self.latest_finish_time
            )));
        }
        if self.value < 0 {
            return Err(invalid(format!("negative value {}", self.value)));
        }
        Ok(())
    }
}

pub fn single_reservation(id: RequestId) -> ReservationOrder {
    let mut order = ReservationOrder::new();
    order.push(id);
    order.push(id);
    order
}

/// Hands out consecutive request ids for one scheduling epoch.
#[derive(Debug, Default)]
pub struct RequestIdAllocator {
    next: RequestId,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> RequestId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn allocated(&self) -> usize {
        self.next
    }
}

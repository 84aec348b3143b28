pub mod catalog;
pub mod request;
pub mod travel_matrix;

pub type Point = usize;

pub type RequestId = usize;

/// Timestamps and durations in whole seconds.
pub type Time = i64;

/// Value and cost units of a request.
pub type Value = i64;

pub const COST_PER_DISTANCE: f64 = 1.0;
pub const VALUE_PER_DISTANCE: f64 = COST_PER_DISTANCE * 10.0;

/// default network speed in distance units per second
pub const DEFAULT_SPEED: f64 = 0.1;

pub struct Arc {
    pub from: Point,
    pub to: Point,
    pub distance: f64,
    pub time: f64,
}

// all conversions truncate toward zero; `as` saturates, so an unreachable (infinite) distance
// becomes `Value::MAX`
#[inline(always)]
pub fn dist_to_cost(distance: f64) -> Value {
    (distance * COST_PER_DISTANCE) as Value
}

#[inline(always)]
pub fn dist_to_value(distance: f64) -> Value {
    (distance * VALUE_PER_DISTANCE) as Value
}

#[inline(always)]
pub fn dist_to_time(distance: f64, speed: f64) -> Time {
    (distance / speed) as Time
}

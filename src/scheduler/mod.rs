use fixedbitset::FixedBitSet;
use log::trace;

use crate::error::{OptimizerError, Result};
use crate::problem::request::{single_reservation, Request, ReservationOrder};
use crate::problem::travel_matrix::TravelMatrix;
use crate::problem::{dist_to_cost, Point, RequestId, Value};

/// Result of one pass of the scheduler: the jobs one vehicle serves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduledRoute {
    /// original request ids, earliest first
    pub fulfilled: Vec<RequestId>,
    pub total_value: Value,
    /// pickup/drop-off events, earliest first
    pub reservation_order: Vec<ReservationOrder>,
}

/// Weighted interval scheduling with travel cost between consecutive jobs.
///
/// Jobs must be sorted ascending by `latest_finish_time`. Job `j` may follow its predecessor
/// `p(j)`, the nearest earlier job whose expected finish plus the (slack-adjusted) travel time to
/// `j` lies strictly before the expected start of `j`. The value of `j` is its own value plus the
/// best value up to `p(j)`, minus the cost of driving from `p(j)` (or from the start point) to
/// `j`, but never less than 1.
pub struct SingleRouteScheduler<'a, M: TravelMatrix> {
    matrix: &'a M,
    start_point: Point,
    time_safety_factor: f64,
}

impl<'a, M: TravelMatrix> SingleRouteScheduler<'a, M> {
    pub fn new(matrix: &'a M, start_point: Point, time_safety_factor: f64) -> Self {
        Self {
            matrix,
            start_point,
            time_safety_factor,
        }
    }

    /// Finds one optimal route; fails if `jobs` is not sorted by latest finish time.
    pub fn schedule(&self, jobs: &[Request]) -> Result<ScheduledRoute> {
        if let Some(index) = first_unsorted_index(jobs) {
            return Err(OptimizerError::UnsortedJobs { index });
        }
        Ok(self.one_optimal_route(jobs))
    }

    pub(crate) fn one_optimal_route(&self, jobs: &[Request]) -> ScheduledRoute {
        debug_assert_eq!(first_unsorted_index(jobs), None);
        let n = jobs.len();

        let predecessors = self.predecessors(jobs);

        let mut values: Vec<Value> = vec![0; n + 1];
        for j in 1..=n {
            let value = self.value_cost(jobs, &predecessors, &values, j);
            values[j] = value.max(values[j - 1]);
        }

        let indices = self.find_opt(jobs, &predecessors, &values);
        let route = expand_reservations(jobs, &indices, values[n]);
        trace!(
            "{} jobs: {} requests fulfilled (value: {})",
            n,
            route.fulfilled.len(),
            route.total_value
        );
        route
    }

    /// Nearest compatible predecessor of every job.
    pub fn predecessors(&self, jobs: &[Request]) -> Vec<Option<usize>> {
        (0..jobs.len()).map(|j| self.predecessor(jobs, j)).collect()
    }

    fn predecessor(&self, jobs: &[Request], j: usize) -> Option<usize> {
        let job = &jobs[j];
        (0..j).rev().find(|&i| {
            let pre = &jobs[i];
            // unreachable: never compatible
            self.matrix
                .time(pre.to_point, job.from_point)
                .map_or(false, |travel_time| {
                    job.expected_start_time as f64
                        > pre.expected_finish_time as f64 + travel_time * self.time_safety_factor
                })
        })
    }

    // `j` is 1-based, `values[0]` is the empty route
    fn value_cost(
        &self,
        jobs: &[Request],
        predecessors: &[Option<usize>],
        values: &[Value],
        j: usize,
    ) -> Value {
        let job = &jobs[j - 1];
        let (from, pre_value) = match predecessors[j - 1] {
            Some(pre) => (jobs[pre].to_point, values[pre + 1]),
            None => (self.start_point, 0),
        };
        let cost = self
            .matrix
            .distance(from, job.from_point)
            .map_or(Value::MAX, dist_to_cost);
        // do not return negative values
        job.value.saturating_add(pre_value).saturating_sub(cost).max(1)
    }

    /// Indices of the jobs in the optimal route, latest first.
    fn find_opt(
        &self,
        jobs: &[Request],
        predecessors: &[Option<usize>],
        values: &[Value],
    ) -> Vec<usize> {
        let mut indices = vec![];
        let mut j = jobs.len();
        while j > 0 {
            // strict comparison: on a tie the job is left out
            if self.value_cost(jobs, predecessors, values, j) > values[j - 1] {
                indices.push(j - 1);
                j = predecessors[j - 1].map_or(0, |pre| pre + 1);
            } else {
                j -= 1;
            }
        }
        indices
    }
}

fn first_unsorted_index(jobs: &[Request]) -> Option<usize> {
    jobs.windows(2)
        .position(|pair| pair[0].latest_finish_time > pair[1].latest_finish_time)
        .map(|position| position + 1)
}

fn insert_id(set: &mut FixedBitSet, id: RequestId) -> bool {
    if id >= set.len() {
        set.grow(id + 1);
    }
    !set.put(id)
}

/// Translates the selected jobs into original requests and pickup/drop-off events.
///
/// A shared ride whose passengers are both still unserved contributes its own reservation order;
/// if one of them is already part of the route, only the other one is added as a single trip.
fn expand_reservations(jobs: &[Request], indices: &[usize], total_value: Value) -> ScheduledRoute {
    let mut fulfilled_set = FixedBitSet::with_capacity(jobs.len());
    let mut fulfilled = vec![];
    let mut reservation_order = vec![];

    for &j in indices {
        let job = &jobs[j];
        match job.contains {
            Some((first, second)) => {
                let first_new = insert_id(&mut fulfilled_set, first);
                let second_new = insert_id(&mut fulfilled_set, second);
                match (first_new, second_new) {
                    (true, true) => {
                        fulfilled.push(first);
                        fulfilled.push(second);
                        reservation_order.push(job.reservations());
                    }
                    (true, false) => {
                        fulfilled.push(first);
                        reservation_order.push(single_reservation(first));
                    }
                    (false, true) => {
                        fulfilled.push(second);
                        reservation_order.push(single_reservation(second));
                    }
                    (false, false) => {}
                }
            }
            None => {
                if insert_id(&mut fulfilled_set, job.id) {
                    fulfilled.push(job.id);
                    reservation_order.push(single_reservation(job.id));
                }
            }
        }
        trace!(
            "{:3} {:4} {:4} {:?}",
            job.id,
            job.submit_time,
            job.latest_finish_time,
            reservation_order.last()
        );
    }

    // reconstruction walks backwards: early reservations first
    fulfilled.reverse();
    reservation_order.reverse();

    ScheduledRoute {
        fulfilled,
        total_value,
        reservation_order,
    }
}

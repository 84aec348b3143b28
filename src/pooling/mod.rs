use log::trace;
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use took::Timer;

use crate::pooling::path::shrink_multi_step_distance;
use crate::problem::request::{Request, ReservationOrder};
use crate::problem::travel_matrix::TravelMatrix;
use crate::problem::{dist_to_cost, dist_to_time};

pub mod path;

/// Synthesizes shared-ride variants out of pairs of original requests.
pub struct ShareableVariantGenerator<'a, M: TravelMatrix> {
    matrix: &'a M,
    speed: f64,
}

impl<'a, M: TravelMatrix> ShareableVariantGenerator<'a, M> {
    pub fn new(matrix: &'a M, speed: f64) -> Self {
        Self { matrix, speed }
    }

    /// Finds all sharing variants between the given original requests.
    ///
    /// `requests` are expected in the order the scheduler consumes them (ascending latest finish
    /// time). Every request is paired with all requests in front of it; the resulting variants get
    /// ids `requests.len()..` in scan order (`j` descending, then `i` descending).
    pub fn generate(&self, requests: &[Request]) -> Vec<Request> {
        let timer = Timer::new();
        let n = requests.len();

        #[cfg(feature = "parallel")]
        let iter = (0..n).into_par_iter().rev();
        #[cfg(not(feature = "parallel"))]
        let iter = (0..n).rev();

        // one buffer per request; ids are assigned after the ordered merge below
        let buffers: Vec<Vec<Request>> = iter
            .map(|j| {
                (0..j)
                    .rev()
                    .filter_map(|i| self.share_ride(&requests[i], &requests[j]))
                    .collect()
            })
            .collect();

        let variants: Vec<Request> = buffers
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(k, mut variant)| {
                variant.id = n + k;
                trace!(
                    "variant {} contains {:?} (value: {})",
                    variant.id,
                    variant.contains,
                    variant.value
                );
                variant
            })
            .collect();

        log::info!(
            "found {} sharing variants for {} requests after {}",
            variants.len(),
            n,
            timer.took()
        );
        variants
    }

    /// Tries to serve `req_pre` as a detour of `req`.
    ///
    /// The variant keeps the id of `req`; callers assign a fresh id.
    pub fn share_ride(&self, req_pre: &Request, req: &Request) -> Option<Request> {
        debug_assert!(!req_pre.is_variant() && !req.is_variant());

        if req_pre.latest_finish_time < req.expected_start_time {
            // req_pre ends before req starts
            None
        } else if req_pre.expected_start_time > req.expected_start_time {
            self.full_overlap(req_pre, req)
        } else {
            self.partial_overlap(req_pre, req)
        }
    }

    // req.start -> req_pre.start -> req_pre.finish -> req.finish
    fn full_overlap(&self, req_pre: &Request, req: &Request) -> Option<Request> {
        let direct = self.matrix.distance(req.from_point, req.to_point)?;
        let (gross, path) = shrink_multi_step_distance(
            self.matrix,
            &[req.from_point, req_pre.from_point, req_pre.to_point, req.to_point],
        )?;
        let added_value = req_pre.value - dist_to_cost(gross - direct);

        // a tiny speed saturates the travel time; the sum must not wrap around
        let travel_time = dist_to_time(gross, self.speed);
        if req.expected_start_time.saturating_add(travel_time) >= req.latest_finish_time {
            return None;
        }

        let mut variant = req.clone();
        variant.value += added_value;
        variant.contains = Some((req.id, req_pre.id));
        variant.path = Some(path);
        variant.reservation_order =
            Some(ReservationOrder::from([req.id, req_pre.id, req_pre.id, req.id]));
        Some(variant)
    }

    // req_pre.start -> req.start -> req_pre.finish -> req.finish
    fn partial_overlap(&self, req_pre: &Request, req: &Request) -> Option<Request> {
        let direct = self.matrix.distance(req.from_point, req.to_point)?;
        let direct_pre = self.matrix.distance(req_pre.from_point, req_pre.to_point)?;
        let (gross, path) = shrink_multi_step_distance(
            self.matrix,
            &[req_pre.from_point, req.from_point, req_pre.to_point, req.to_point],
        )?;
        let added_value = req_pre.value - dist_to_cost(gross - direct - direct_pre);

        // both legs are measured on their own sub-route, sharing the middle edge
        let (leg_pre, _) = shrink_multi_step_distance(
            self.matrix,
            &[req_pre.from_point, req.from_point, req_pre.to_point],
        )?;
        let (leg, _) = shrink_multi_step_distance(
            self.matrix,
            &[req.from_point, req_pre.to_point, req.to_point],
        )?;
        let travel_time_pre = dist_to_time(leg_pre, self.speed);
        let travel_time = dist_to_time(leg, self.speed);

        if req.expected_start_time.saturating_add(travel_time) >= req.latest_finish_time
            || req_pre.expected_start_time.saturating_add(travel_time_pre)
                >= req_pre.latest_finish_time
        {
            return None;
        }

        let mut variant = req.clone();
        variant.expected_start_time = req_pre.expected_start_time;
        variant.from_point = req_pre.from_point;
        variant.value += added_value;
        variant.contains = Some((req.id, req_pre.id));
        variant.path = Some(path);
        variant.reservation_order =
            Some(ReservationOrder::from([req_pre.id, req.id, req_pre.id, req.id]));
        Some(variant)
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::request::tests::job;
    use crate::problem::travel_matrix::tests::uniform_matrix;
    use crate::problem::travel_matrix::{FixSizedTravelMatrix, FixSizedTravelMatrixBuilder};
    use crate::problem::Arc;

    use super::*;

    fn matrix_with(num_points: usize, arcs: &[(usize, usize, f64)]) -> FixSizedTravelMatrix {
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(num_points);
        for &(from, to, distance) in arcs {
            builder
                .set_arc(Arc {
                    from,
                    to,
                    distance,
                    time: distance * 10.0,
                })
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn full_overlap_nests_the_shorter_trip() {
        let matrix = matrix_with(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 1.0), (0, 3, 3.0)]);
        let a = job(0, 0, 3, (0, 30, 100), 30);
        let b = job(1, 1, 2, (10, 30, 50), 20);
        let requests = vec![b.clone(), a.clone()];

        let variants = ShareableVariantGenerator::new(&matrix, 0.5).generate(&requests);

        assert_eq!(variants.len(), 1);
        let variant = &variants[0];
        assert_eq!(variant.id, 2);
        // detour: 1 + 2 + 1 - 3
        assert_eq!(variant.value, a.value + b.value - 1);
        assert_eq!(variant.contains, Some((a.id, b.id)));
        itertools::assert_equal(variant.reservations(), vec![0, 1, 1, 0]);
        assert_eq!(variant.path, Some(vec![0, 1, 2, 3]));
        assert_eq!(variant.expected_start_time, a.expected_start_time);
        assert_eq!(variant.from_point, a.from_point);
        assert_eq!(variant.latest_finish_time, a.latest_finish_time);
    }

    #[test]
    fn full_overlap_requires_arrival_before_latest_finish() {
        let matrix = matrix_with(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 1.0), (0, 3, 3.0)]);
        // 4 distance units at speed 0.5 take 8 seconds
        let a = job(0, 0, 3, (0, 6, 8), 30);
        let b = job(1, 1, 2, (2, 4, 5), 20);

        let generator = ShareableVariantGenerator::new(&matrix, 0.5);
        assert_eq!(generator.share_ride(&b, &a), None);

        let a = job(0, 0, 3, (0, 6, 9), 30);
        assert!(generator.share_ride(&b, &a).is_some());
    }

    #[test]
    fn saturated_travel_time_is_infeasible() {
        let matrix = uniform_matrix(4, 1e4, 10.0);
        let a = job(0, 0, 3, (5, 30, 100), 30);
        let b = job(1, 1, 2, (10, 30, 50), 20);
        let generator = ShareableVariantGenerator::new(&matrix, 1e-15);

        // full overlap
        assert_eq!(generator.share_ride(&b, &a), None);
        // partial overlap
        assert_eq!(generator.share_ride(&a, &b), None);
    }

    #[test]
    fn partial_overlap_starts_with_the_earlier_pickup() {
        let matrix = matrix_with(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 2, 2.0), (1, 3, 2.0)],
        );
        let pre = job(0, 0, 2, (0, 20, 60), 20);
        let req = job(1, 1, 3, (10, 30, 100), 20);

        let variants =
            ShareableVariantGenerator::new(&matrix, 0.5).generate(&[pre.clone(), req.clone()]);

        assert_eq!(variants.len(), 1);
        let variant = &variants[0];
        // shared route is one unit shorter than both direct trips
        assert_eq!(variant.value, 41);
        assert_eq!(variant.contains, Some((1, 0)));
        itertools::assert_equal(variant.reservations(), vec![0, 1, 0, 1]);
        assert_eq!(variant.expected_start_time, pre.expected_start_time);
        assert_eq!(variant.from_point, pre.from_point);
        assert_eq!(variant.to_point, req.to_point);
        assert_eq!(variant.latest_finish_time, req.latest_finish_time);
    }

    #[test]
    fn partial_overlap_checks_both_passengers() {
        let matrix = matrix_with(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 2, 2.0), (1, 3, 2.0)],
        );
        // the first passenger's leg 0 -> 1 -> 2 takes 4 seconds
        let pre = job(0, 0, 2, (0, 3, 4), 20);
        let req = job(1, 1, 3, (1, 30, 100), 20);

        let generator = ShareableVariantGenerator::new(&matrix, 0.5);
        assert_eq!(generator.share_ride(&pre, &req), None);

        let pre = job(0, 0, 2, (0, 3, 5), 20);
        assert!(generator.share_ride(&pre, &req).is_some());
    }

    #[test]
    fn shared_pickup_point_collapses_the_path() {
        let matrix = matrix_with(4, &[(0, 2, 2.0), (2, 3, 1.0), (0, 3, 2.0)]);
        let pre = job(0, 0, 2, (0, 20, 60), 20);
        let req = job(1, 0, 3, (10, 30, 100), 20);

        let variants = ShareableVariantGenerator::new(&matrix, 0.5).generate(&[pre, req]);

        assert_eq!(variants.len(), 1);
        let variant = &variants[0];
        assert_eq!(variant.path, Some(vec![0, 2, 3]));
        // shared route of 3 replaces two direct trips of 2 each
        assert_eq!(variant.value, 41);
        itertools::assert_equal(variant.reservations(), vec![0, 1, 0, 1]);
        assert_eq!(variant.from_point, 0);
    }

    #[test]
    fn disjoint_windows_are_not_shared() {
        let matrix = uniform_matrix(4, 1.0, 10.0);
        let pre = job(0, 0, 1, (0, 5, 9), 10);
        let req = job(1, 2, 3, (10, 20, 30), 10);

        assert!(ShareableVariantGenerator::new(&matrix, 0.5)
            .generate(&[pre, req])
            .is_empty());
    }

    #[test]
    fn unreachable_legs_are_not_shared() {
        let matrix = matrix_with(4, &[(0, 3, 3.0), (1, 2, 2.0)]);
        let a = job(0, 0, 3, (0, 30, 100), 30);
        let b = job(1, 1, 2, (10, 30, 50), 20);

        assert!(ShareableVariantGenerator::new(&matrix, 0.5)
            .generate(&[b, a])
            .is_empty());
    }

    #[test]
    fn ids_follow_the_scan_order() {
        let matrix = uniform_matrix(6, 1.0, 10.0);
        let requests = vec![
            job(0, 0, 1, (0, 10, 1000), 10),
            job(1, 2, 3, (0, 10, 1001), 10),
            job(2, 4, 5, (0, 10, 1002), 10),
        ];

        let variants = ShareableVariantGenerator::new(&matrix, 0.5).generate(&requests);

        itertools::assert_equal(variants.iter().map(|it| it.id), 3..6);
        itertools::assert_equal(
            variants.iter().map(|it| it.contains.unwrap()),
            vec![(2, 1), (2, 0), (1, 0)],
        );
    }

    #[test]
    fn identical_input_gives_identical_variants() {
        let matrix = uniform_matrix(6, 1.5, 10.0);
        let requests: Vec<_> = (0..6)
            .map(|id| {
                let start = id as i64 * 5;
                job(id, id, (id + 1) % 6, (start, start + 10, 200 + id as i64), 15)
            })
            .collect();
        let generator = ShareableVariantGenerator::new(&matrix, 0.5);

        assert_eq!(generator.generate(&requests), generator.generate(&requests));
    }
}

use fixedbitset::FixedBitSet;

use crate::problem::catalog::RequestCatalog;
use crate::problem::RequestId;
use crate::solution::{FleetPlan, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    EmptyRoute { route: usize },
    UnknownRequest(RequestId),
    DuplicateService(RequestId),
    ReservationMismatch { route: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorResult {
    Valid { unserved: Vec<RequestId> },
    ConstraintViolation(Violation),
}

impl ValidatorResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn assert_valid(&self) {
        match self {
            Self::Valid { .. } => {}
            Self::ConstraintViolation(violation) => {
                panic!("{:?}", violation)
            }
        }
    }
}

/// Every original request is served exactly twice (pickup and drop-off) within its route.
fn validate_route(route: &Route) -> bool {
    let mut counts = vec![0usize; route.fulfilled.len()];
    for id in route.iter_reservations() {
        match route.fulfilled.iter().position(|&it| it == id) {
            Some(pos) => counts[pos] += 1,
            None => return false,
        }
    }
    counts.into_iter().all(|count| count == 2)
}

/// Checks that no request is served twice and that all served requests are known.
pub fn validate_plan(catalog: &RequestCatalog, plan: &FleetPlan) -> ValidatorResult {
    use ValidatorResult::*;
    use Violation::*;

    let mut served = FixedBitSet::with_capacity(catalog.len());
    for (idx, route) in plan.routes.iter().enumerate() {
        if route.fulfilled.is_empty() {
            return ConstraintViolation(EmptyRoute { route: idx });
        }
        for &id in &route.fulfilled {
            if id >= catalog.len() {
                return ConstraintViolation(UnknownRequest(id));
            }
            if served.put(id) {
                return ConstraintViolation(DuplicateService(id));
            }
        }
        if !validate_route(route) {
            return ConstraintViolation(ReservationMismatch { route: idx });
        }
    }

    Valid {
        unserved: (0..catalog.len()).filter(|&id| !served.contains(id)).collect(),
    }
}

pub fn assert_valid_plan(catalog: &RequestCatalog, plan: &FleetPlan) {
    validate_plan(catalog, plan).assert_valid()
}

#[cfg(test)]
mod tests {
    use crate::problem::request::tests::job;
    use crate::problem::request::{single_reservation, ReservationOrder};

    use super::*;

    fn catalog(n: usize) -> RequestCatalog {
        RequestCatalog::from_requests(
            (0..n)
                .map(|id| job(id, 0, 1, (10, 20, 30), 10))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn valid_plan_reports_unserved() {
        let plan = FleetPlan::new(
            vec![Route {
                fulfilled: vec![0, 2, 1],
                reservation_order: vec![
                    single_reservation(0),
                    ReservationOrder::from([2, 1, 1, 2]),
                ],
                total_value: 30,
            }],
            4,
        );
        assert_eq!(
            validate_plan(&catalog(4), &plan),
            ValidatorResult::Valid { unserved: vec![3] }
        );
    }

    #[test]
    fn double_service_is_detected() {
        let plan = FleetPlan::new(
            vec![
                Route {
                    fulfilled: vec![0],
                    reservation_order: vec![single_reservation(0)],
                    total_value: 10,
                },
                Route {
                    fulfilled: vec![1, 0],
                    reservation_order: vec![ReservationOrder::from([1, 0, 0, 1])],
                    total_value: 10,
                },
            ],
            2,
        );
        assert_eq!(
            validate_plan(&catalog(2), &plan),
            ValidatorResult::ConstraintViolation(Violation::DuplicateService(0))
        );
    }

    #[test]
    fn reservations_must_match_fulfilled() {
        let plan = FleetPlan::new(
            vec![Route {
                fulfilled: vec![0, 1],
                reservation_order: vec![single_reservation(0)],
                total_value: 10,
            }],
            2,
        );
        let result = validate_plan(&catalog(2), &plan);
        assert!(!result.is_valid());
        assert_eq!(
            result,
            ValidatorResult::ConstraintViolation(Violation::ReservationMismatch { route: 0 })
        );
    }

    #[test]
    fn unknown_request() {
        let plan = FleetPlan::new(
            vec![Route {
                fulfilled: vec![5],
                reservation_order: vec![single_reservation(5)],
                total_value: 10,
            }],
            2,
        );
        assert_eq!(
            validate_plan(&catalog(2), &plan),
            ValidatorResult::ConstraintViolation(Violation::UnknownRequest(5))
        );
    }
}

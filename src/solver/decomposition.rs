use fixedbitset::FixedBitSet;
use log::{debug, warn};

use crate::problem::request::Request;
use crate::problem::travel_matrix::TravelMatrix;
use crate::problem::Point;
use crate::scheduler::SingleRouteScheduler;
use crate::solution::Route;
use crate::utils::logging::format_log_route;
use crate::utils::DecompositionTracker;

/// Covers the requests with vehicle routes by solving the single-route problem repeatedly.
///
/// Every pass schedules one vehicle over all remaining candidates (originals and variants) and
/// removes everything that touches a served request afterwards. Each pass serves at least one
/// original request, so there are at most as many passes as originals.
pub struct FleetRouteDecomposer<'a, M: TravelMatrix> {
    scheduler: SingleRouteScheduler<'a, M>,
}

impl<'a, M: TravelMatrix> FleetRouteDecomposer<'a, M> {
    pub fn new(matrix: &'a M, start_point: Point, time_safety_factor: f64) -> Self {
        Self {
            scheduler: SingleRouteScheduler::new(matrix, start_point, time_safety_factor),
        }
    }

    pub fn decompose(
        &self,
        originals: &[Request],
        variants: &[Request],
        tracker: &mut impl DecompositionTracker,
    ) -> Vec<Route> {
        debug_assert!(
            variants_merge_originals(originals, variants),
            "every variant must merge two original requests"
        );

        // retain keeps the relative order, so sorting once is enough
        let mut candidates: Vec<Request> =
            originals.iter().chain(variants.iter()).cloned().collect();
        candidates.sort_by_key(|request| request.latest_finish_time);

        let mut routes = vec![];
        while !candidates.is_empty() {
            let route: Route = self.scheduler.one_optimal_route(&candidates).into();
            if route.fulfilled.is_empty() {
                warn!(
                    "no request served from {} remaining candidates",
                    candidates.len()
                );
                break;
            }

            let served = served_ids(&route);
            candidates.retain(|candidate| match candidate.contains {
                Some((first, second)) => !served.contains(first) && !served.contains(second),
                None => !served.contains(candidate.id),
            });

            debug!(
                "route {}: {} ({} candidates left)",
                routes.len(),
                format_log_route(&route),
                candidates.len()
            );
            tracker.route_found(&route, candidates.len());
            routes.push(route);
        }
        routes
    }
}

fn variants_merge_originals(originals: &[Request], variants: &[Request]) -> bool {
    let capacity = originals.iter().map(|request| request.id + 1).max().unwrap_or(0);
    let mut original_ids = FixedBitSet::with_capacity(capacity);
    originals
        .iter()
        .filter(|request| !request.is_variant())
        .for_each(|request| original_ids.insert(request.id));
    variants.iter().all(|variant| match variant.contains {
        Some((first, second)) => original_ids.contains(first) && original_ids.contains(second),
        None => false,
    })
}

fn served_ids(route: &Route) -> FixedBitSet {
    let capacity = route.fulfilled.iter().max().map_or(0, |&id| id + 1);
    let mut served = FixedBitSet::with_capacity(capacity);
    route.fulfilled.iter().for_each(|&id| served.insert(id));
    served
}

/// Decomposes the originals (sorted by latest finish time) and their variants into routes.
pub fn routing_with_variants<M: TravelMatrix>(
    originals: &[Request],
    variants: &[Request],
    matrix: &M,
    start_point: Point,
    time_safety_factor: f64,
    tracker: &mut impl DecompositionTracker,
) -> Vec<Route> {
    FleetRouteDecomposer::new(matrix, start_point, time_safety_factor).decompose(
        originals,
        variants,
        tracker,
    )
}

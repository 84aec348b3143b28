use itertools::Itertools;
use took::Took;

use crate::solution::{FleetPlan, Route};

pub fn format_log_method_plan_timed(method: &str, plan: &FleetPlan, took: Took) -> String {
    format!("{method} - {}, took: {took}", format_log_plan(plan))
}

/// `<unserved>/<vehicles>/<value>`
pub fn format_log_plan(plan: &FleetPlan) -> String {
    format!(
        "{}/{}/{} (shared rides: {})",
        plan.unserved_ids().len(),
        plan.number_of_vehicles(),
        plan.total_value(),
        plan.number_of_shared_rides(),
    )
}

pub fn format_log_route(route: &Route) -> String {
    format!(
        "[{}] (value: {})",
        route.iter_reservations().join(" "),
        route.total_value
    )
}

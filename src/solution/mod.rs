use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::problem::request::ReservationOrder;
use crate::problem::{RequestId, Value};
use crate::scheduler::ScheduledRoute;

/// Route of a single vehicle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// original requests served on this route
    pub fulfilled: Vec<RequestId>,
    pub reservation_order: Vec<ReservationOrder>,
    pub total_value: Value,
}

impl Route {
    pub fn number_of_shared_rides(&self) -> usize {
        self.reservation_order
            .iter()
            .filter(|order| order.len() > 2)
            .count()
    }

    pub fn iter_reservations(&self) -> impl Iterator<Item = RequestId> + '_ {
        self.reservation_order.iter().flat_map(|order| order.iter().cloned())
    }
}

impl From<ScheduledRoute> for Route {
    fn from(route: ScheduledRoute) -> Self {
        Self {
            fulfilled: route.fulfilled,
            reservation_order: route.reservation_order,
            total_value: route.total_value,
        }
    }
}

/// All routes computed for one epoch, in the order they were found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetPlan {
    pub routes: Vec<Route>,
    pub num_requests: usize,
}

impl FleetPlan {
    pub fn new(routes: Vec<Route>, num_requests: usize) -> Self {
        Self {
            routes,
            num_requests,
        }
    }

    pub fn number_of_vehicles(&self) -> usize {
        self.routes.len()
    }

    pub fn total_value(&self) -> Value {
        self.routes.iter().map(|route| route.total_value).sum()
    }

    pub fn number_of_fulfilled_requests(&self) -> usize {
        self.routes.iter().map(|route| route.fulfilled.len()).sum()
    }

    pub fn number_of_shared_rides(&self) -> usize {
        self.routes
            .iter()
            .map(|route| route.number_of_shared_rides())
            .sum()
    }

    pub fn fulfilled_ids(&self) -> FixedBitSet {
        let mut fulfilled = FixedBitSet::with_capacity(self.num_requests);
        self.routes
            .iter()
            .flat_map(|route| route.fulfilled.iter())
            .filter(|&&id| id < self.num_requests)
            .for_each(|&id| fulfilled.insert(id));
        fulfilled
    }

    pub fn unserved_ids(&self) -> Vec<RequestId> {
        let fulfilled = self.fulfilled_ids();
        (0..self.num_requests)
            .filter(|&id| !fulfilled.contains(id))
            .collect()
    }
}

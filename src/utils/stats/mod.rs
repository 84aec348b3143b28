pub mod route_statistics;
pub use route_statistics::{RouteStatistics, RouteTrackingInfo};

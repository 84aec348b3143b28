use log::{debug, info};
use took::{Timer, Took};

use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::pooling::ShareableVariantGenerator;
use crate::problem::catalog::RequestCatalog;
use crate::problem::travel_matrix::TravelMatrix;
use crate::solution::FleetPlan;
use crate::solver::decomposition::FleetRouteDecomposer;
use crate::utils::logging::format_log_method_plan_timed;
use crate::utils::DecompositionTracker;

pub mod decomposition;

pub struct SolverResult {
    pub plan: FleetPlan,
    pub time: Took,
}

/// Computes the routes for all requests of the catalog.
///
/// The configuration is checked before anything else is computed. An empty catalog gives an empty
/// plan.
pub fn optimize<M: TravelMatrix>(
    catalog: &RequestCatalog,
    matrix: &M,
    config: &OptimizerConfig,
    tracker: &mut impl DecompositionTracker,
) -> Result<SolverResult> {
    let timer = Timer::new();
    if catalog.is_empty() {
        config.validate_parameters()?;
        return Ok(SolverResult {
            plan: FleetPlan::new(vec![], 0),
            time: timer.took(),
        });
    }
    config.validate(matrix.num_points())?;

    let originals = catalog.sorted_by_latest_finish();
    let variants = if config.sharing {
        ShareableVariantGenerator::new(matrix, config.speed).generate(&originals)
    } else {
        debug!("sharing disabled");
        vec![]
    };

    let routes = FleetRouteDecomposer::new(matrix, config.start_point, config.time_safety_factor)
        .decompose(&originals, &variants, tracker);
    let plan = FleetPlan::new(routes, catalog.len());

    info!("{}", format_log_method_plan_timed("optimize", &plan, timer.took()));

    Ok(SolverResult {
        plan,
        time: timer.took(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::OptimizerConfigBuilder;
    use crate::error::{ConfigError, OptimizerError};
    use crate::io::generator::{generate_instance, GeneratorParameters};
    use crate::io::Instance;
    use crate::problem::catalog::MaxDelay;
    use crate::problem::request::Request;
    use crate::problem::travel_matrix::tests::uniform_matrix;
    use crate::utils::create_seeded_rng;
    use crate::utils::stats::route_statistics::RouteStatistics;
    use crate::utils::validator::assert_valid_plan;
    use crate::utils::DisabledTracker;

    use super::*;

    fn config(sharing: bool) -> OptimizerConfig {
        OptimizerConfigBuilder::default()
            .time_safety_factor(1.2)
            .sharing(sharing)
            .build()
            .unwrap()
    }

    fn random_instance(seed: i128, num_requests: usize) -> Instance {
        let params = GeneratorParameters {
            num_points: 12,
            num_requests,
            epoch_duration: 1800,
            area: 100.0,
            ..GeneratorParameters::default()
        };
        generate_instance(&params, &mut create_seeded_rng(seed)).unwrap()
    }

    #[test]
    fn every_request_is_served_at_most_once() -> anyhow::Result<()> {
        for seed in 0..10 {
            let instance = random_instance(seed, 25);
            let catalog = instance.build_catalog(Some(&MaxDelay::default()))?;
            let mut stats = RouteStatistics::new();

            let result = optimize(&catalog, &instance.matrix, &config(true), &mut stats)?;

            assert_valid_plan(&catalog, &result.plan);
            // every route serves at least one request
            assert!(result.plan.number_of_vehicles() <= catalog.len());
            // nothing is left behind, at worst with one vehicle per request
            assert!(result.plan.unserved_ids().is_empty());
            assert_eq!(stats.num_routes, result.plan.number_of_vehicles());
            assert_eq!(stats.total_value, result.plan.total_value());
        }
        Ok(())
    }

    #[test]
    fn identical_input_gives_identical_plans() -> anyhow::Result<()> {
        let instance = random_instance(17, 30);
        let catalog = instance.build_catalog(Some(&MaxDelay::default()))?;

        let mut tracker = DisabledTracker::new();
        let first = optimize(&catalog, &instance.matrix, &config(true), &mut tracker)?;
        let second = optimize(&catalog, &instance.matrix, &config(true), &mut tracker)?;
        assert_eq!(first.plan, second.plan);
        Ok(())
    }

    #[test]
    fn without_sharing_every_order_is_a_single_trip() -> anyhow::Result<()> {
        let instance = random_instance(4, 20);
        let catalog = instance.build_catalog(None)?;

        let mut tracker = DisabledTracker::new();
        let result = optimize(&catalog, &instance.matrix, &config(false), &mut tracker)?;

        assert_valid_plan(&catalog, &result.plan);
        assert_eq!(result.plan.number_of_shared_rides(), 0);
        assert!(result
            .plan
            .routes
            .iter()
            .flat_map(|route| route.reservation_order.iter())
            .all(|order| order.len() == 2));
        Ok(())
    }

    #[test]
    fn three_requests_round_trip() -> anyhow::Result<()> {
        let matrix = uniform_matrix(6, 1.0, 2.0);
        let catalog = RequestCatalog::from_requests(vec![
            Request::new(0, 0, 1, 0, 1.0, 2),
            Request::new(1, 2, 3, 5, 1.0, 2),
            Request::new(2, 4, 5, 20, 1.0, 2),
        ])?;

        let result = optimize(&catalog, &matrix, &config(false), &mut DisabledTracker::new())?;

        assert_eq!(result.plan.number_of_vehicles(), 1);
        assert_eq!(result.plan.routes[0].fulfilled, vec![0, 1, 2]);
        assert_eq!(result.plan.total_value(), 28);
        Ok(())
    }

    #[test]
    fn empty_catalog_gives_an_empty_plan() -> anyhow::Result<()> {
        let matrix = uniform_matrix(0, 1.0, 1.0);
        let result = optimize(
            &RequestCatalog::default(),
            &matrix,
            &config(true),
            &mut DisabledTracker::new(),
        )?;
        assert_eq!(result.plan.number_of_vehicles(), 0);
        assert_eq!(result.plan.total_value(), 0);
        Ok(())
    }

    #[test]
    fn invalid_configuration_is_rejected_before_solving() {
        let matrix = uniform_matrix(2, 1.0, 1.0);
        let catalog =
            RequestCatalog::from_requests(vec![Request::new(0, 0, 1, 0, 1.0, 2)]).unwrap();
        let mut config = config(true);
        config.time_safety_factor = -1.0;

        let result = optimize(&catalog, &matrix, &config, &mut DisabledTracker::new());
        assert!(matches!(
            result,
            Err(OptimizerError::InvalidConfiguration(
                ConfigError::NegativeTimeSafetyFactor(_)
            ))
        ));

        config.time_safety_factor = 1.0;
        config.start_point = 2;
        let result = optimize(&catalog, &matrix, &config, &mut DisabledTracker::new());
        assert!(matches!(
            result,
            Err(OptimizerError::InvalidConfiguration(
                ConfigError::StartPointOutOfRange { .. }
            ))
        ));
    }
}

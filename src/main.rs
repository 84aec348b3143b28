use anyhow::bail;
use clap::{CommandFactory, FromArgMatches};
use log::{debug, info};
use os_str_bytes::OsStrBytesExt;
use rand::random;
use took::Timer;

use fleet_route_optimizer::config::OptimizerConfigBuilder;
use fleet_route_optimizer::io::generator::{generate_instance, GeneratorParameters};
use fleet_route_optimizer::io::load_instance;
use fleet_route_optimizer::io::route_writer::{write_route_file, write_summary_json, PlanSummary};
use fleet_route_optimizer::problem::catalog::MaxDelay;
use fleet_route_optimizer::solver;
use fleet_route_optimizer::utils::create_seeded_rng;
use fleet_route_optimizer::utils::stats::route_statistics::RouteStatistics;
use fleet_route_optimizer::utils::validator::{validate_plan, ValidatorResult};

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?;
    let args = cli::ProgramArguments::from_arg_matches(
        &cli::ProgramArguments::command()
            .get_matches_from(args.iter().flat_map(|it| {
                it.split(" ").into_iter().collect::<Vec<_>>()
            }))
    )?;
    info!("{:?}", &args);

    let mut rng = {
        let seed_value = args.seed.unwrap_or_else(|| random::<i128>().abs());
        info!("seed: {}", seed_value);
        create_seeded_rng(seed_value)
    };

    let load_timer = Timer::new();
    let instance = match (&args.instance, args.generate) {
        (Some(path), _) => load_instance(path.as_str())?,
        (None, Some(num_requests)) => generate_instance(
            &GeneratorParameters {
                num_points: args.generator.points,
                num_requests,
                epoch_duration: args.generator.epoch_duration,
                area: args.generator.area,
                speed: args.optimizer.speed,
            },
            &mut rng,
        )?,
        (None, None) => bail!("either an instance or a number of requests to generate is required"),
    };
    let catalog = instance.build_catalog(Some(&MaxDelay {
        call_to_start: args.optimizer.call_to_start,
        realistic_time: args.optimizer.realistic_time,
        late_time: args.optimizer.late_time,
    }))?;
    info!("instance loaded after {}", load_timer.took());

    // detours are checked against realistic (stretched) travel times
    let config = OptimizerConfigBuilder::default()
        .start_point(args.optimizer.start_point)
        .time_safety_factor(args.optimizer.time_safety_factor)
        .speed(args.optimizer.speed / args.optimizer.realistic_time)
        .sharing(!args.optimizer.no_sharing)
        .build()?;

    info!("starting solver");
    let mut stats = RouteStatistics::new();
    let res = solver::optimize(&catalog, &instance.matrix, &config, &mut stats)?;

    info!("finished after {}", res.time);
    match validate_plan(&catalog, &res.plan) {
        ValidatorResult::Valid { unserved } => info!(
            "plan found: {} routes, {} shared rides, value {}, {} unserved",
            res.plan.number_of_vehicles(),
            res.plan.number_of_shared_rides(),
            res.plan.total_value(),
            unserved.len()
        ),
        ValidatorResult::ConstraintViolation(violation) => {
            bail!("invalid plan: {:?}", violation)
        }
    }
    debug!("{:?}", &stats);

    if args.print_summary_to_stdout {
        println!(
            "{},{},{},{}",
            res.plan.unserved_ids().len(),
            res.plan.number_of_vehicles(),
            res.plan.total_value(),
            res.time.as_std().as_secs()
        );
    }

    let summary = PlanSummary::with_result(&instance.name, &res);
    if let Some(solution_path) = &args.solution {
        write_route_file(solution_path.as_str(), &summary)?;
    }
    if let Some(summary_path) = &args.summary_json {
        write_summary_json(summary_path.as_str(), &summary)?;
    }

    Ok(())
}

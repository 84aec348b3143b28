use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use serde::Serialize;

use crate::problem::{RequestId, Value};
use crate::solution::{FleetPlan, Route};
use crate::solver::SolverResult;

#[derive(Debug, Serialize)]
pub struct PlanSummary<'a> {
    pub instance: &'a str,
    pub num_requests: usize,
    pub num_vehicles: usize,
    pub num_fulfilled: usize,
    pub unserved: Vec<RequestId>,
    pub num_shared_rides: usize,
    pub total_value: Value,
    pub took: Option<String>,
    pub routes: &'a [Route],
}

impl<'a> PlanSummary<'a> {
    pub fn with_plan(instance: &'a str, plan: &'a FleetPlan) -> Self {
        Self {
            instance,
            num_requests: plan.num_requests,
            num_vehicles: plan.number_of_vehicles(),
            num_fulfilled: plan.number_of_fulfilled_requests(),
            unserved: plan.unserved_ids(),
            num_shared_rides: plan.number_of_shared_rides(),
            total_value: plan.total_value(),
            took: None,
            routes: &plan.routes,
        }
    }

    pub fn with_result(instance: &'a str, result: &'a SolverResult) -> Self {
        Self {
            took: Some(result.time.to_string()),
            ..Self::with_plan(instance, &result.plan)
        }
    }
}

pub fn write_routes(mut file: impl Write, summary: &PlanSummary) -> anyhow::Result<()> {
    writeln!(file, "Instance name:    {}", summary.instance)?;
    writeln!(
        file,
        "Solution: {};{};{};{}",
        summary.unserved.len(),
        summary.num_vehicles,
        summary.total_value,
        summary.took.as_deref().unwrap_or("-")
    )?;

    // Route 1 : 3 3 0 5 5 0
    // Route 2 : 1 1
    for (idx, route) in summary.routes.iter().enumerate() {
        write!(file, "Route {} :", idx + 1)?;
        for id in route.iter_reservations() {
            write!(file, " {}", id)?;
        }
        writeln!(file)?;
    }
    Ok(())
}

pub fn write_route_file(path: impl Into<String>, summary: &PlanSummary) -> anyhow::Result<()> {
    let path = path.into();
    let f = File::create(&path).with_context(|| format!("cannot create {}", path))?;
    let mut file = BufWriter::new(&f);
    write_routes(&mut file, summary)?;
    file.flush()?;
    Ok(())
}

pub fn write_summary_json(path: impl Into<String>, summary: &PlanSummary) -> anyhow::Result<()> {
    let path = path.into();
    let f = File::create(&path).with_context(|| format!("cannot create {}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(&f), summary)?;
    Ok(())
}

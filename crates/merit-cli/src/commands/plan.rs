use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use merit_algo::{DispatchPlanner, DispatchSolution};
use merit_cli::cli::PlanFormat;
use merit_io::{encode_plan, load_payload};
use tabwriter::TabWriter;
use tracing::{debug, info};

pub fn handle(planner: &DispatchPlanner, payload: &Path, format: PlanFormat) -> Result<()> {
    let request = load_payload(payload)?;
    info!(
        payload = %payload.display(),
        load = request.load.value(),
        units = request.units.len(),
        "planning"
    );
    let solution = planner
        .plan(&request)
        .with_context(|| format!("planning {}", payload.display()))?;

    for issue in &solution.diagnostics.issues {
        debug!(%issue, "diagnostic");
    }

    match format {
        PlanFormat::Json => println!("{}", encode_plan(&solution.entries)?),
        PlanFormat::Table => write_table(&solution)?,
    }
    Ok(())
}

fn write_table(solution: &DispatchSolution) -> Result<()> {
    let mut tw = TabWriter::new(io::stdout());
    writeln!(tw, "unit\tpower (MW)")?;
    for entry in &solution.entries {
        writeln!(tw, "{}\t{:.1}", entry.id, entry.power.value())?;
    }
    writeln!(tw, "total\t{:.1}", solution.total_power().value())?;
    tw.flush()?;
    println!("Hourly cost: {:.2} €", solution.total_cost);
    println!("{}", solution.diagnostics.summary());
    Ok(())
}

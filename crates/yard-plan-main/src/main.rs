// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use serde::Serialize;
use std::{fs::File, io::BufWriter, process::ExitCode, time::Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yard_plan_core::cost::Cost;
use yard_plan_model::prelude::*;
use yard_plan_solver::prelude::*;

const CONFIG_FILE: &str = "yard_config.csv";
const SNAPSHOT_FILE: &str = "mock_yard.csv";
const COMMANDS_FILE: &str = "mock_commands.csv";
const OUTPUT_FILE: &str = "output_missions.csv";
const REPORT_FILE: &str = "run_report.json";

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct RunReport {
    rows: usize,
    bays: usize,
    tiers: usize,
    capacity: usize,
    containers: usize,
    targets: usize,
    baseline_cost: Option<u64>,
    best_cost: Option<u64>,
    improvement_pct: Option<f64>,
    optimize_ms: u128,
    total_ms: u128,
    best_sequence: Vec<u32>,
}

fn finite(cost: Cost) -> Option<u64> {
    (!cost.is_infeasible()).then(|| cost.value())
}

fn cost_label(cost: Cost) -> String {
    match finite(cost) {
        Some(value) => value.to_string(),
        None => "infeasible".to_string(),
    }
}

fn improvement_pct(baseline: Cost, best: Cost) -> Option<f64> {
    let baseline = finite(baseline)?;
    let best = finite(best)?;
    if baseline == 0 {
        return Some(0.0);
    }
    Some((baseline as f64 - best as f64) / baseline as f64 * 100.0)
}

fn load_problem() -> Result<Problem, ExitCode> {
    let layout = match load_layout_path(CONFIG_FILE) {
        Ok(layout) => layout,
        Err(e) => {
            warn!(error = %e, "could not read {CONFIG_FILE}, using fallback layout");
            YardLayout::FALLBACK
        }
    };
    info!(layout = %layout, "yard layout");

    let snapshot = match load_snapshot_path(SNAPSHOT_FILE) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: could not read {SNAPSHOT_FILE}: {e}");
            return Err(ExitCode::FAILURE);
        }
    };
    let commands = match load_commands_path(COMMANDS_FILE) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("Error: could not read {COMMANDS_FILE}: {e}");
            return Err(ExitCode::FAILURE);
        }
    };

    let mut builder = ProblemBuilder::new(layout);
    for record in &snapshot {
        if let Err(e) = builder.add_container(record.id(), record.position()) {
            eprintln!("Error: invalid snapshot row: {e}");
            return Err(ExitCode::FAILURE);
        }
    }

    let mut batch_id = None;
    let mut dropped = 0usize;
    for command in commands.iter().filter(|c| c.kind() == CommandKind::Target) {
        if builder.add_target(command.carrier()) {
            batch_id.get_or_insert(command.batch_id());
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(dropped, "target commands referencing absent containers were dropped");
    }
    if let Some(batch_id) = batch_id {
        builder.batch_id(batch_id);
    }

    let problem = builder.build();
    if problem.targets().is_empty() {
        eprintln!("Error: no valid targets.");
        return Err(ExitCode::FAILURE);
    }
    Ok(problem)
}

fn main() -> ExitCode {
    enable_tracing();
    let total_start = Instant::now();

    let problem = match load_problem() {
        Ok(problem) => problem,
        Err(code) => return code,
    };
    info!(
        containers = problem.initial_yard().len(),
        targets = problem.targets().len(),
        "instance loaded"
    );

    let config = SolverConfig::new();
    let simulator = Simulator::new(&config.search, problem.batch_id(), config.base_time);

    let baseline = simulator.evaluate(problem.initial_yard(), problem.targets());
    info!(baseline = %baseline, "baseline order evaluated");

    let optimize_start = Instant::now();
    let outcome = EvolveEngine::new(&config).solve(&problem);
    let optimize_elapsed = optimize_start.elapsed();

    let Some(plan) = simulator.plan(problem.initial_yard(), outcome.sequence()) else {
        eprintln!("Error: best order is infeasible; no mission log emitted.");
        return ExitCode::FAILURE;
    };

    if let Err(e) = write_missions_path(OUTPUT_FILE, plan.missions()) {
        eprintln!("Error: could not write {OUTPUT_FILE}: {e}");
        return ExitCode::FAILURE;
    }

    let total_elapsed = total_start.elapsed();
    let layout = problem.layout();
    let report = RunReport {
        rows: layout.rows(),
        bays: layout.bays(),
        tiers: layout.tiers(),
        capacity: layout.capacity(),
        containers: problem.initial_yard().len(),
        targets: problem.targets().len(),
        baseline_cost: finite(baseline),
        best_cost: finite(plan.cost()),
        improvement_pct: improvement_pct(baseline, plan.cost()),
        optimize_ms: optimize_elapsed.as_millis(),
        total_ms: total_elapsed.as_millis(),
        best_sequence: outcome.sequence().iter().map(|id| id.value()).collect(),
    };
    match File::create(REPORT_FILE) {
        Ok(file) => {
            if let Err(e) = serde_json::to_writer_pretty(BufWriter::new(file), &report) {
                eprintln!("Error: could not write {REPORT_FILE}: {e}");
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            eprintln!("Error: could not create {REPORT_FILE}: {e}");
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("================ EXPERIMENT REPORT ================");
    println!("Optimization Time  : {:.3} sec", optimize_elapsed.as_secs_f64());
    println!("Total Elapsed Time : {:.3} sec", total_elapsed.as_secs_f64());
    println!("---------------------------------------------------");
    println!("Original Cost      : {}", cost_label(baseline));
    println!("Optimized Cost     : {}", cost_label(plan.cost()));
    match report.improvement_pct {
        Some(pct) => println!("Improvement        : {pct:.2}%"),
        None => println!("Improvement        : n/a"),
    }
    println!("---------------------------------------------------");
    println!("Final Target Sequence (Optimized Order):");
    let rendered: Vec<String> = outcome
        .sequence()
        .iter()
        .map(|id| id.value().to_string())
        .collect();
    println!("[ {} ]", rendered.join(", "));
    println!("Detailed log saved to '{OUTPUT_FILE}'");

    ExitCode::SUCCESS
}

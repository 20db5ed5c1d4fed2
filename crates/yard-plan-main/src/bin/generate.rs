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

use std::{
    env,
    process::ExitCode,
    time::{SystemTime, UNIX_EPOCH},
};
use yard_plan_model::generator::{InstanceGenConfigBuilder, InstanceGenerator};

fn usage(program: &str) {
    eprintln!("Usage: {program} <rows> <bays> <tiers> <total_boxes> <mission_count>");
    eprintln!("Example: {program} 6 11 8 400 50");
    eprintln!("Or run without arguments to use defaults.");
}

fn parse(arg: &str, name: &str) -> Result<usize, String> {
    arg.parse::<usize>()
        .map_err(|_| format!("invalid {name}: '{arg}'"))
}

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "yard-plan-gen".to_string());
    let args: Vec<String> = args.collect();

    let mut builder = InstanceGenConfigBuilder::new();
    match args.len() {
        0 => println!("No arguments provided. Using default configuration."),
        5 => {
            let parsed = (|| -> Result<InstanceGenConfigBuilder, String> {
                Ok(builder
                    .rows(parse(&args[0], "rows")?)
                    .bays(parse(&args[1], "bays")?)
                    .tiers(parse(&args[2], "tiers")?)
                    .total_boxes(parse(&args[3], "total_boxes")?)
                    .mission_count(parse(&args[4], "mission_count")?))
            })();
            match parsed {
                Ok(b) => builder = b,
                Err(e) => {
                    eprintln!("Error: {e}");
                    usage(&program);
                    return ExitCode::FAILURE;
                }
            }
        }
        _ => {
            usage(&program);
            return ExitCode::FAILURE;
        }
    }

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    let config = match builder.seed(seed).build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let layout = config.layout();
    println!("--- Generator Configuration ---");
    println!(
        "Grid Size    : {} x {} x {}",
        layout.rows(),
        layout.bays(),
        layout.tiers()
    );
    println!("Capacity     : {} slots", layout.slot_count());
    println!(
        "Total Boxes  : {} ({:.1}% full)",
        config.total_boxes(),
        config.total_boxes() as f64 / layout.slot_count() as f64 * 100.0
    );
    println!("Missions     : {}", config.mission_count());
    println!("-------------------------------");

    let instance = InstanceGenerator::new(config).generate();
    if let Err(e) = instance.write_to_dir(".") {
        eprintln!("Error: could not write instance files: {e}");
        return ExitCode::FAILURE;
    }

    println!("Success! Generated files:");
    println!("1. mock_yard.csv (Layout)");
    println!("2. mock_commands.csv (Missions)");
    println!("3. yard_config.csv (Dimensions)");

    ExitCode::SUCCESS
}

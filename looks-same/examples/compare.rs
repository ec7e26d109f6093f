//! Compare two image files and print where they differ.
//!
//! ```text
//! cargo run --example compare -- reference.png current.png [diff.png]
//! ```

use std::env;
use std::process::ExitCode;

use looks_same::io::{create_diff_file, load_pair};
use looks_same::{looks_same, CompareOptions, DiffOptions};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <reference> <current> [diff.png]", args[0]);
        return ExitCode::from(2);
    }

    let options = CompareOptions::default().with_should_cluster(true);

    let result = match args.get(3) {
        Some(diff_path) => create_diff_file(
            &args[1],
            &args[2],
            diff_path,
            &DiffOptions::new(options),
        )
        .map(|outcome| (outcome.equal, outcome.diff_bounds, outcome.diff_clusters)),
        None => load_pair(&args[1], &args[2])
            .and_then(|(reference, current)| looks_same(&reference, &current, &options))
            .map(|report| (report.equal, report.diff_bounds, report.diff_clusters)),
    };

    match result {
        Ok((true, _, _)) => {
            println!("equal");
            ExitCode::SUCCESS
        }
        Ok((false, bounds, clusters)) => {
            println!("different, bounds: {bounds:?}");
            for cluster in clusters {
                println!("  cluster: {cluster:?}");
            }
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

use anyhow::Context;
use clap::Parser;
use colored::*;
use inmet_precip::cli::{Args, init_logging};
use inmet_precip::processor::BatchProcessor;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config();
    config.validate().context("Invalid arguments")?;

    let output_path = args.get_output_path(&args.input_dir);
    let processor =
        BatchProcessor::new(args.input_dir.clone(), output_path).with_config(config);

    if processor.config().inspect_only {
        return inspect(&processor);
    }

    processor.process().with_context(|| {
        format!(
            "Failed to aggregate station files in {}",
            args.input_dir.display()
        )
    })?;
    Ok(())
}

/// Print header detection and column resolution for every file
fn inspect(processor: &BatchProcessor) -> anyhow::Result<()> {
    let inspections = processor.inspect().context("Inspection failed")?;
    println!(
        "{}",
        format!("Inspected {} station files", inspections.len())
            .bright_green()
            .bold()
    );

    for inspection in &inspections {
        println!("\n{}", inspection.path.display().to_string().bright_cyan());
        let origin = if inspection.header.detected {
            "detected"
        } else {
            "fallback, unverified"
        };
        println!(
            "  header line {} ({}), {} data rows",
            inspection.header.skip_rows, origin, inspection.data_rows
        );
        for column in &inspection.columns {
            println!("    - '{}'", column);
        }
        match &inspection.schema {
            Some(schema) => println!(
                "  {} date='{}' precipitation='{}' ({:?} match)",
                "✓".bright_green(),
                schema.date_column,
                schema.precipitation_column,
                schema.precipitation_match
            ),
            None => println!("  {} no precipitation column", "✗".bright_red()),
        }
    }
    Ok(())
}

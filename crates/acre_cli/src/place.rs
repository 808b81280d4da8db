//! `acre place`: floorplan a design.
//!
//! 1. Load the run configuration and apply command-line overrides
//! 2. Load the design and resolve it into a problem
//! 3. Run the floorplanner
//! 4. Render diagnostics and emit the report

use std::fmt::Write as _;
use std::path::Path;

use acre_config::FloorplanConfig;
use acre_diagnostics::DiagnosticSink;
use acre_floorplan::Floorplan;

use crate::pipeline::{load_problem, load_run_config, render_diagnostics};
use crate::{GlobalArgs, PlaceArgs, ReportFormat};

/// Exit code for a completed run whose layout exceeds the outline.
const EXIT_INFEASIBLE: i32 = 2;

/// Runs the `acre place` command.
///
/// Returns exit code 0 for a feasible floorplan and 2 for an infeasible one.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design_path = Path::new(&args.design);

    // Step 1: Configuration
    let mut config = load_run_config(global, design_path)?;
    apply_overrides(&mut config, args)?;

    // Step 2: Design
    let problem = load_problem(design_path)?;
    if !global.quiet {
        eprintln!(
            "   Placing {} ({} blocks, {} nets)",
            args.design,
            problem.blocks.len(),
            problem.nets.len()
        );
    }

    // Step 3: Floorplan
    let sink = DiagnosticSink::new();
    let plan = acre_floorplan::floorplan(&problem, &config, &sink)?;

    // Step 4: Report
    render_diagnostics(&sink.diagnostics(), global);

    match args.output {
        Some(ref output) => {
            let json = serde_json::to_string_pretty(&plan)?;
            std::fs::write(output, json)?;
            if !global.quiet {
                eprintln!("   Wrote {output}");
            }
        }
        None => match args.format {
            ReportFormat::Text => print!("{}", format_text(&plan)),
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        },
    }

    if !global.quiet {
        eprintln!(
            "   Result: {:.3} x {:.3} in {:.3} x {:.3}, {}",
            plan.width,
            plan.height,
            plan.outline.width,
            plan.outline.height,
            if plan.feasible { "feasible" } else { "infeasible" }
        );
    }

    Ok(if plan.feasible { 0 } else { EXIT_INFEASIBLE })
}

/// Applies `--seed`, `--workers` and `--levels`, then revalidates.
fn apply_overrides(
    config: &mut FloorplanConfig,
    args: &PlaceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(workers) = args.workers {
        config.parallel.num_worker = workers;
    }
    if let Some(levels) = args.levels {
        config.parallel.num_level = levels;
    }
    acre_config::validate_config(config)?;
    Ok(())
}

/// Formats a floorplan as a plain-text table.
fn format_text(plan: &Floorplan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>4} {:>10} {:>10} {:>10} {:>10}",
        "block", "kind", "x", "y", "width", "height"
    );
    for block in &plan.blocks {
        let _ = writeln!(
            out,
            "{:<20} {:>4} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            block.name,
            if block.hard { "hard" } else { "soft" },
            block.x,
            block.y,
            block.width,
            block.height
        );
    }
    let t = &plan.terms;
    let _ = writeln!(out);
    let _ = writeln!(out, "cost        {:.6}", plan.cost);
    let _ = writeln!(out, "area        {:.3}", t.area);
    let _ = writeln!(out, "wirelength  {:.3}", t.wirelength);
    let _ = writeln!(out, "outline     {:.3}", t.outline);
    let _ = writeln!(out, "boundary    {:.3}", t.boundary);
    let _ = writeln!(out, "blockage    {:.3}", t.macro_blockage);
    let _ = writeln!(out, "location    {:.3}", t.location);
    let _ = writeln!(out, "notch       {:.3}", t.notch);
    out
}

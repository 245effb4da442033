//! woebin: WoE binning CLI tool
//!
//! Bins every requested variable against a binary target, optionally trims
//! the bins until their WoE is monotonic, and writes the binning report.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use woebin::cli::{build_feature_specs, resolve_variables, Cli};
use woebin::pipeline::{load_dataset, save_dataset, Binner};
use woebin::report::{write_report, BinningSummary, ExportParams};
use woebin::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_path = cli.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &cli.target,
        &output_path,
        &cli.strategy.to_string(),
        &cli.binner_config(),
        cli.trim.then_some(cli.trim_min_iv),
    );

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(&cli.input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());
    println!(
        "      {}",
        style(format!("Loaded in {:.2?}", step_start.elapsed())).dim()
    );

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !columns.contains(&cli.target) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            cli.target,
            columns
        );
    }

    let variables = resolve_variables(&cli, &columns);
    if variables.is_empty() {
        anyhow::bail!("No variables to bin. Use --variables to select columns.");
    }
    let specs = build_feature_specs(&cli, &variables)?;

    let mut binner = Binner::with_strategy(cli.strategy, cli.binner_config())?;
    for (name, spec) in specs {
        binner.set_feature_spec(name, spec);
    }

    // Step 2: Fit
    print_step_header(2, "Binning");
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Binning {} variable(s)...", variables.len()));
    binner
        .fit(&df, &cli.target, &variables)
        .context("Binning failed")?;
    finish_with_success(&spinner, "Binning complete");

    let non_monotonic = binner
        .features_bins()
        .filter(|(_, fb)| !fb.is_monotonic())
        .count();
    print_count("variable(s) with non-monotonic WoE", non_monotonic, None);
    println!(
        "      {}",
        style(format!("Binned in {:.2?}", step_start.elapsed())).dim()
    );

    // Step 3: Optional monotonic trimming
    let mut trims = Vec::new();
    if cli.trim {
        print_step_header(3, "Monotonic Trimming");

        let candidates: Vec<String> = binner
            .features_iv()
            .into_iter()
            .filter(|(_, iv)| *iv > cli.trim_min_iv)
            .map(|(name, _)| name)
            .collect();

        let pb = create_progress_bar(candidates.len() as u64, "Trimming");
        for name in &candidates {
            let result = binner
                .trim(&df, &cli.target, std::slice::from_ref(name))
                .with_context(|| format!("Trimming failed for '{}'", name))?;
            trims.extend(result);
            pb.inc(1);
        }

        if candidates.is_empty() {
            finish_with_warning(&pb, "No variable above the IV threshold");
        } else {
            finish_with_success(&pb, "Trimming complete");
            let merges: usize = trims.iter().map(|t| t.merges).sum();
            print_count(
                "merge(s) applied",
                merges,
                Some(&format!("(IV > {:.3})", cli.trim_min_iv)),
            );
        }
    } else {
        print_info("Trimming disabled (use --trim to enforce monotonic WoE)");
    }

    // Step 4: Save
    print_step_header(if cli.trim { 4 } else { 3 }, "Save Results");
    let params = ExportParams {
        input_file: &cli.input.display().to_string(),
        target_column: &cli.target,
    };
    write_report(&binner, &output_path, &params)?;
    print_success(&format!("Report saved to {}", output_path.display()));

    if let Some(woe_path) = &cli.woe_output {
        let mut encoded = binner
            .transform(&df, &variables)
            .context("WoE encoding failed")?;
        save_dataset(&mut encoded, woe_path)?;
        print_success(&format!("WoE values saved to {}", woe_path.display()));
    }

    BinningSummary::from_binner(&binner, &trims).display();
    print_completion();

    Ok(())
}

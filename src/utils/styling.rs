//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::BinnerConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██╗    ██╗ ██████╗ ███████╗██████╗ ██╗███╗   ██╗
    ██║    ██║██╔═══██╗██╔════╝██╔══██╗██║████╗  ██║
    ██║ █╗ ██║██║   ██║█████╗  ██████╔╝██║██╔██╗ ██║
    ██║███╗██║██║   ██║██╔══╝  ██╔══██╗██║██║╚██╗██║
    ╚███╔███╔╝╚██████╔╝███████╗██████╔╝██║██║ ╚████║
     ╚══╝╚══╝  ╚═════╝ ╚══════╝╚═════╝ ╚═╝╚═╝  ╚═══╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("ω").magenta().bold(),
        style("Weight of Evidence binning").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    input: &Path,
    target: &str,
    output: &Path,
    strategy: &str,
    config: &BinnerConfig,
    trim_min_iv: Option<f64>,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_path(input, 38));
    println!("    │  {} Target: {:<39}│", TARGET, truncate_string(target, 38));
    println!("    │  {} Report: {:<39}│", SAVE, truncate_path(output, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Strategy:         {:<29}│",
        CHART,
        style(strategy).yellow()
    );
    println!(
        "    │  {} Max leaf nodes:   {:<29}│",
        CHART,
        style(config.max_leaf_nodes).yellow()
    );
    println!(
        "    │  {} Min samples leaf: {:<29}│",
        CHART,
        style(format!("{:.1}%", config.min_samples_leaf * 100.0)).yellow()
    );
    if let Some(min_iv) = trim_min_iv {
        println!(
            "    │  {} Trim above IV:    {:<29}│",
            SCISSORS,
            style(format!("{:.3}", min_iv)).yellow()
        );
    }
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!("    {} {}", ROCKET, style("woebin binning complete!").green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

//! Jozsa Demo Suite
//!
//! A narrated walkthrough of the Deutsch-Jozsa algorithm: every oracle is
//! built, simulated and classified, with the histogram printed along the way.
//!
//! ```no_run
//! use jozsa_demos::runners::Walkthrough;
//!
//! # async fn demo() -> Result<(), jozsa_algo::AlgoError> {
//! let steps = Walkthrough::new(3).with_seed(7).run().await?;
//! for step in &steps {
//!     println!("{}: {}", step.outcome.oracle, step.outcome.classification);
//! }
//! # Ok(())
//! # }
//! ```

pub mod runners;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use jozsa_hal::Counts;

/// Width of a full histogram bar.
pub const BAR_WIDTH: usize = 40;

/// Create a spinner for demo operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Plain-text histogram rows, most frequent first.
///
/// Each row is `bitstring count bar`, the bar scaled so that a bitstring
/// holding every shot spans [`BAR_WIDTH`] cells.
pub fn histogram_rows(counts: &Counts) -> Vec<String> {
    let total = counts.total_shots();
    if total == 0 {
        return Vec::new();
    }
    counts
        .sorted()
        .into_iter()
        .map(|(bitstring, count)| {
            let cells = (count as f64 / total as f64 * BAR_WIDTH as f64).round() as usize;
            format!("{bitstring} {count:>6} {}", "█".repeat(cells))
        })
        .collect()
}

/// Print a histogram with one row per observed bitstring.
pub fn print_histogram(counts: &Counts) {
    let rows = histogram_rows(counts);
    if rows.is_empty() {
        println!("  {}", style("(no shots recorded)").dim());
        return;
    }
    for row in rows {
        println!("  {}", style(row).cyan());
    }
}

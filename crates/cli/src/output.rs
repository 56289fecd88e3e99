//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use rightsize_lib::models::{Action, Recommendation};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the recommendations table
#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Monthly Diff")]
    monthly_diff: String,
}

/// Print the run's recommendations in the selected format.
pub fn print_recommendations(
    recommendations: &[Recommendation],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(recommendations)?);
        }
        OutputFormat::Table => {
            if recommendations.is_empty() {
                print_info("All analyzed instances look right-sized");
                return Ok(());
            }

            let rows: Vec<RecommendationRow> = recommendations
                .iter()
                .map(|r| RecommendationRow {
                    instance: r.instance.db_instance_identifier.clone(),
                    class: r.instance.db_instance_class.clone(),
                    action: color_action(r.action),
                    reason: reason_text(r),
                    target: r
                        .recommended_instance_type
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                    metric: r
                        .metric_value
                        .map(|v| format!("{:.2}", v))
                        .unwrap_or_else(|| "-".to_string()),
                    monthly_diff: r
                        .monthly_approximate_price_diff
                        .map(format_price_diff)
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} recommendations", recommendations.len());
        }
    }

    Ok(())
}

/// The single aggregate cost line; silent when the run is cost-neutral.
pub fn print_cost_difference(total_monthly_diff: f64) {
    if total_monthly_diff > 0.0 {
        println!(
            "{}",
            format!(
                "The changes will yield a price increase of approximately ${:.2} per month",
                total_monthly_diff
            )
            .yellow()
        );
    } else if total_monthly_diff < 0.0 {
        println!(
            "{}",
            format!(
                "The changes will yield a savings of approximately ${:.2} per month",
                -total_monthly_diff
            )
            .green()
        );
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn color_action(action: Action) -> String {
    match action {
        Action::UpScale => "UpScale".yellow().to_string(),
        Action::DownScale => "DownScale".green().to_string(),
        Action::Terminate => "Terminate".red().to_string(),
    }
}

fn reason_text(recommendation: &Recommendation) -> String {
    // Reuse the serialized form so the table matches the report file.
    serde_json::to_value(recommendation.reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn format_price_diff(diff: f64) -> String {
    if diff < 0.0 {
        format!("-${:.2}", -diff)
    } else {
        format!("+${:.2}", diff)
    }
}

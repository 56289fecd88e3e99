//! The `catalog` commands: inspect and validate the instance-type catalog

use anyhow::{Context, Result};
use rightsize_lib::InstanceCatalog;
use tabled::{settings::Style, Table, Tabled};

use crate::catalog_source;
use crate::output::{print_success, print_warning, OutputFormat};

/// Row for the catalog table
#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    type_id: String,
    #[tabled(rename = "vCPU")]
    vcpu: i64,
    #[tabled(rename = "Mem (GiB)")]
    mem: i64,
    #[tabled(rename = "Max BW (Mbit)")]
    max_bandwidth: String,
    #[tabled(rename = "$/hour")]
    std_price: String,
    #[tabled(rename = "Up")]
    up: String,
    #[tabled(rename = "Down")]
    down: String,
}

async fn load(source: &str) -> Result<InstanceCatalog> {
    let document = catalog_source::fetch(source).await?;
    InstanceCatalog::from_json(&document).context("failed to load instance type catalog")
}

/// Print every catalog entry.
pub async fn show(source: &str, format: OutputFormat) -> Result<()> {
    let catalog = load(source).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        OutputFormat::Table => {
            let rows: Vec<TypeRow> = catalog
                .iter()
                .map(|(type_id, props)| TypeRow {
                    type_id: type_id.to_string(),
                    vcpu: props.vcpu,
                    mem: props.mem,
                    max_bandwidth: props
                        .max_bandwidth
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    std_price: format!("{:.3}", props.std_price),
                    up: props.up.clone().unwrap_or_else(|| "-".to_string()),
                    down: props.down.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} instance types", catalog.len());
        }
    }

    Ok(())
}

/// Check the catalog's up/down link invariants and report every problem.
/// Exits non-zero when the catalog is inconsistent.
pub async fn validate(source: &str) -> Result<()> {
    let catalog = load(source).await?;
    let issues = catalog.validate();

    if issues.is_empty() {
        print_success(&format!(
            "catalog is consistent ({} instance types)",
            catalog.len()
        ));
        return Ok(());
    }

    for issue in &issues {
        print_warning(&issue.to_string());
    }
    anyhow::bail!("catalog has {} inconsistencies", issues.len());
}

//! `wavescope signals` — variables declared directly in one scope.
//!
//! Resolves the scope path, then reads rows through the [`ListModel`]
//! adapter, the same contract a signal-list widget would use.

use std::error::Error;

use serde::Serialize;
use wavescope_model::{ListModel, VariableListModel};
use wavescope_vcd::Variable;

use crate::{ReportFormat, SignalsArgs};

/// One variable row, shaped for JSON output.
#[derive(Serialize)]
struct SignalRow {
    reference: String,
    var_type: String,
    width: u32,
    index: Option<String>,
    changes: usize,
}

impl SignalRow {
    fn from_variable(var: &Variable) -> Self {
        Self {
            reference: var.reference.clone(),
            var_type: var.var_type.to_string(),
            width: var.width,
            index: var.index.map(|i| i.to_string()),
            changes: var.changes.len(),
        }
    }
}

/// Runs the `wavescope signals` command.
pub fn run(args: &SignalsArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let wave = wavescope_vcd::load_file(&args.file)?;
    let scope = wave
        .find_scope(&args.scope)
        .ok_or_else(|| format!("scope not found: {}", args.scope))?;
    let model = VariableListModel::new(&wave, scope)?;

    if !quiet {
        let label = if args.scope.is_empty() {
            "<root>"
        } else {
            args.scope.as_str()
        };
        eprintln!("   {} signal(s) in {label}", model.row_count());
    }

    let mut rows = Vec::with_capacity(model.row_count());
    for row in 0..model.row_count() {
        rows.push(SignalRow::from_variable(model.item_at(row)?));
    }

    match args.format {
        ReportFormat::Text => {
            for row in &rows {
                let reference = match &row.index {
                    Some(index) => format!("{}{index}", row.reference),
                    None => row.reference.clone(),
                };
                println!(
                    "{reference:<24} {:<10} {:>4}  {} change(s)",
                    row.var_type, row.width, row.changes
                );
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(0)
}

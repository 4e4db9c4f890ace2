//! `wavescope tree` — scope hierarchy rendering.
//!
//! Walks the hierarchy through the [`TreeModel`] adapter rather than the
//! raw scope arena, so the command exercises the same contract a tree
//! widget would.

use std::error::Error;

use serde::Serialize;
use wavescope_model::{ModelError, ScopeTreeModel, TreeModel};
use wavescope_vcd::ScopeId;

use crate::{ReportFormat, TreeArgs};

/// One scope in the JSON rendering of the hierarchy.
#[derive(Serialize)]
struct TreeNode {
    name: String,
    scope_type: String,
    children: Vec<TreeNode>,
}

/// Runs the `wavescope tree` command.
pub fn run(args: &TreeArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let wave = wavescope_vcd::load_file(&args.file)?;
    if !quiet {
        eprintln!(
            "   Loaded {} ({} scopes, {} variables)",
            args.file.display(),
            wave.scopes.len() - 1,
            wave.variables.len()
        );
    }

    let model = ScopeTreeModel::new(&wave);
    match args.format {
        ReportFormat::Text => {
            let mut out = String::new();
            render(&model, None, 0, &mut out)?;
            print!("{out}");
        }
        ReportFormat::Json => {
            let nodes = collect(&model, None)?;
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
    }
    Ok(0)
}

/// Renders the subtree under `parent`, two spaces of indent per level.
fn render(
    model: &ScopeTreeModel,
    parent: Option<ScopeId>,
    depth: usize,
    out: &mut String,
) -> Result<(), ModelError> {
    for row in 0..model.row_count(parent) {
        let node = model.child_at(parent, row)?;
        let name = model.cell(node, 0).unwrap_or_default();
        let scope_type = model.cell(node, 1).unwrap_or_default();
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{name} ({scope_type})\n"));
        render(model, Some(node), depth + 1, out)?;
    }
    Ok(())
}

/// Collects the subtree under `parent` into JSON-shaped nodes.
fn collect(model: &ScopeTreeModel, parent: Option<ScopeId>) -> Result<Vec<TreeNode>, ModelError> {
    let mut nodes = Vec::with_capacity(model.row_count(parent));
    for row in 0..model.row_count(parent) {
        let node = model.child_at(parent, row)?;
        nodes.push(TreeNode {
            name: model.cell(node, 0).unwrap_or_default(),
            scope_type: model.cell(node, 1).unwrap_or_default(),
            children: collect(model, Some(node))?,
        });
    }
    Ok(nodes)
}

//! Tree capability trait and the scope hierarchy adapter.

use wavescope_vcd::{ScopeId, Waveform};

use crate::ModelError;

/// Read-only access to tree-shaped data addressed by `(row, column, parent)`.
///
/// `None` as a parent or node stands for the synthetic root, which is never
/// itself addressable: it has no row of its own and [`Self::parent_of`]
/// never returns it.
pub trait TreeModel {
    /// Opaque node handle, stable for the lifetime of one loaded model.
    type Node: Copy + Eq;

    /// Number of columns the model exposes.
    fn column_count(&self) -> usize;

    /// Display name of a column header, or `None` past the column set.
    fn header(&self, column: usize) -> Option<&str>;

    /// Number of child rows under `parent` (the root when absent).
    ///
    /// Returns 0 for a handle that no longer resolves.
    fn row_count(&self, parent: Option<Self::Node>) -> usize;

    /// Display text for one cell, or `None` for an invalid node or a
    /// column past the column set.
    fn cell(&self, node: Self::Node, column: usize) -> Option<String>;

    /// The node's parent, or `None` when the parent is the (unaddressable)
    /// root or the handle does not resolve.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// The child at `row` under `parent` (the root when absent).
    ///
    /// # Errors
    ///
    /// [`ModelError::RowOutOfRange`] when `row` is at or beyond the child
    /// count, [`ModelError::InvalidNode`] when `parent` does not resolve.
    fn child_at(&self, parent: Option<Self::Node>, row: usize) -> Result<Self::Node, ModelError>;
}

/// [`TreeModel`] over a waveform's scope hierarchy.
///
/// Column 0 is the scope name, column 1 the declared scope type.
pub struct ScopeTreeModel<'a> {
    waveform: &'a Waveform,
}

impl<'a> ScopeTreeModel<'a> {
    /// Column headers, in column order.
    pub const COLUMNS: [&'static str; 2] = ["Name", "Type"];

    /// Creates the adapter over a loaded waveform.
    pub fn new(waveform: &'a Waveform) -> Self {
        Self { waveform }
    }

    fn resolve(&self, node: Option<ScopeId>) -> Option<&'a wavescope_vcd::Scope> {
        self.waveform.scope(node.unwrap_or(self.waveform.root))
    }
}

impl TreeModel for ScopeTreeModel<'_> {
    type Node = ScopeId;

    fn column_count(&self) -> usize {
        Self::COLUMNS.len()
    }

    fn header(&self, column: usize) -> Option<&str> {
        Self::COLUMNS.get(column).copied()
    }

    fn row_count(&self, parent: Option<ScopeId>) -> usize {
        self.resolve(parent).map_or(0, |scope| scope.children.len())
    }

    fn cell(&self, node: ScopeId, column: usize) -> Option<String> {
        let scope = self.waveform.scope(node)?;
        match column {
            0 => Some(scope.name.clone()),
            1 => Some(scope.scope_type.to_string()),
            _ => None,
        }
    }

    fn parent_of(&self, node: ScopeId) -> Option<ScopeId> {
        let parent = self.waveform.scope(node)?.parent?;
        if parent == self.waveform.root {
            None
        } else {
            Some(parent)
        }
    }

    fn child_at(&self, parent: Option<ScopeId>, row: usize) -> Result<ScopeId, ModelError> {
        let scope = self.resolve(parent).ok_or(ModelError::InvalidNode)?;
        scope
            .children
            .get(row)
            .copied()
            .ok_or(ModelError::RowOutOfRange {
                row,
                count: scope.children.len(),
            })
    }
}

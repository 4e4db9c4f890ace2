//! List capability trait and the per-scope variable adapter.

use wavescope_vcd::{ScopeId, Variable, Waveform};

use crate::ModelError;

/// Read-only access to list-shaped data addressed by row number.
pub trait ListModel {
    /// The item type a row resolves to.
    type Item;

    /// Number of rows in the list.
    fn row_count(&self) -> usize;

    /// The item at `row`.
    ///
    /// # Errors
    ///
    /// [`ModelError::RowOutOfRange`] when `row` is at or beyond the count.
    fn item_at(&self, row: usize) -> Result<&Self::Item, ModelError>;
}

/// [`ListModel`] over the variables declared directly in one scope.
///
/// Descendants' variables are not flattened in; selecting a scope shows
/// only its own declarations.
pub struct VariableListModel<'a> {
    waveform: &'a Waveform,
    scope: ScopeId,
}

impl<'a> VariableListModel<'a> {
    /// Creates the adapter for one selected scope.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidNode`] when `scope` does not resolve in the
    /// waveform.
    pub fn new(waveform: &'a Waveform, scope: ScopeId) -> Result<Self, ModelError> {
        if waveform.scope(scope).is_none() {
            return Err(ModelError::InvalidNode);
        }
        Ok(Self { waveform, scope })
    }

    fn var_ids(&self) -> &'a [wavescope_vcd::VarId] {
        self.waveform
            .scope(self.scope)
            .map_or(&[], |scope| scope.variables.as_slice())
    }
}

impl ListModel for VariableListModel<'_> {
    type Item = Variable;

    fn row_count(&self) -> usize {
        self.var_ids().len()
    }

    fn item_at(&self, row: usize) -> Result<&Variable, ModelError> {
        let ids = self.var_ids();
        ids.get(row)
            .and_then(|&id| self.waveform.variable(id))
            .ok_or(ModelError::RowOutOfRange {
                row,
                count: ids.len(),
            })
    }
}

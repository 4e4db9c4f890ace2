//! Read-only projections over a loaded [`wavescope_vcd::Waveform`].
//!
//! Front ends address tree-shaped data by `(row, column, parent)` tuples
//! and list-shaped data by plain row numbers. The [`TreeModel`] and
//! [`ListModel`] traits capture those two capability sets independently of
//! any UI toolkit's indexing convention; [`ScopeTreeModel`] and
//! [`VariableListModel`] implement them over the scope tree and over one
//! scope's variable list. Both adapters are pure projections: they borrow
//! the waveform and hold no state of their own.
//!
//! # Modules
//!
//! - `tree` — Tree capability trait and the scope hierarchy adapter
//! - `list` — List capability trait and the per-scope variable adapter

#![warn(missing_docs)]

pub mod list;
pub mod tree;

pub use list::{ListModel, VariableListModel};
pub use tree::{ScopeTreeModel, TreeModel};

/// Errors from addressing a projection model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A row index was at or beyond the model's row count.
    #[error("row {row} out of range (count {count})")]
    RowOutOfRange {
        /// The requested row.
        row: usize,
        /// The number of rows actually available.
        count: usize,
    },

    /// A node handle did not resolve inside the underlying waveform.
    #[error("invalid node handle")]
    InvalidNode,
}

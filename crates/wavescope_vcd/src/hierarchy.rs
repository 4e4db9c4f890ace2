//! In-memory model of a loaded VCD trace.
//!
//! A [`Waveform`] owns the scope tree, the flat variable table, and the
//! header metadata produced by one load pass. Scopes live in an arena
//! indexed by [`ScopeId`]; parent/child links are indices rather than
//! references, so the tree carries no ownership cycles. The structure is
//! immutable once the loader returns it.

use std::fmt;
use std::sync::Arc;

use vcd::{IdCode, ReferenceIndex, ScopeType, VarType};

/// Identifies a scope in a [`Waveform`]'s scope arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Creates a `ScopeId` from a raw arena index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Identifies a variable in a [`Waveform`]'s flat variable table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarId(u32);

impl VarId {
    /// Creates a `VarId` from a raw table index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw table index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A hierarchical namespace from the VCD header (e.g. a module instance).
///
/// Children and variables are kept in declaration order. The synthetic
/// root scope is the only scope with no parent; its name never appears
/// in [`Waveform::full_path`] output.
#[derive(Clone, Debug)]
pub struct Scope {
    /// Declared scope name.
    pub name: String,
    /// Declared scope kind (`module`, `task`, `function`, ...).
    pub scope_type: ScopeType,
    /// Enclosing scope, `None` only for the synthetic root.
    pub parent: Option<ScopeId>,
    /// Directly nested scopes, in declaration order.
    pub children: Vec<ScopeId>,
    /// Variables declared directly in this scope, in declaration order.
    pub variables: Vec<VarId>,
}

/// A declared signal.
///
/// The identifier code is the short key used inside one VCD file to
/// correlate value changes with declarations. Several variables may share
/// one code (a bus bit declared under multiple names, for example); all of
/// them end up holding the same shared change sequence.
#[derive(Clone, Debug)]
pub struct Variable {
    /// Declared variable kind (`wire`, `reg`, `integer`, ...).
    pub var_type: VarType,
    /// Bit width of the variable.
    pub width: u32,
    /// The file-local identifier code from the declaration.
    pub id_code: IdCode,
    /// Declared display name, without any bit-select suffix.
    pub reference: String,
    /// Bit select or range when the declaration names part of a vector.
    pub index: Option<ReferenceIndex>,
    /// Value changes for this variable's identifier code, sorted by time.
    ///
    /// Shared between all variables declaring the same code;
    /// `Arc::ptr_eq` holds between their sequences.
    pub changes: Arc<[ValueChange]>,
}

/// A single `(simulation time, value)` event.
#[derive(Clone, Debug)]
pub struct ValueChange {
    /// Simulation time in timescale units.
    pub time: u64,
    /// The literal value carried by the change token.
    pub value: ChangeValue,
}

/// The payload of a value change, kept in the literal form the token
/// carried. Interpretation (bit extension, numeric conversion) is left to
/// the consumer.
#[derive(Clone, Debug)]
pub enum ChangeValue {
    /// A single 4-state bit.
    Scalar(vcd::Value),
    /// A fixed-width bit vector, MSB first.
    Vector(vcd::Vector),
    /// A real-number value.
    Real(f64),
    /// A string value.
    String(String),
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeValue::Scalar(v) => write!(f, "{v}"),
            ChangeValue::Vector(v) => write!(f, "{v}"),
            ChangeValue::Real(v) => write!(f, "{v}"),
            ChangeValue::String(v) => f.write_str(v),
        }
    }
}

/// Header metadata from the declaration section.
///
/// Each field holds the accumulated text of the matching declaration
/// command, or `None` when the file never declared it. Repeated
/// `$comment`/`$date`/`$version` commands append line-wise; a repeated
/// `$timescale` replaces the earlier one.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    /// Accumulated `$comment` text.
    pub comment: Option<String>,
    /// Accumulated `$date` text.
    pub date: Option<String>,
    /// Accumulated `$version` text.
    pub version: Option<String>,
    /// The `$timescale` declaration in its literal `"<n> <unit>"` form.
    pub timescale: Option<String>,
}

/// A fully loaded VCD trace: metadata, scope tree, and variable table.
///
/// Produced by [`crate::load_file`] or [`crate::load_tokens`] and
/// immutable afterward, so it can be shared freely between read-only
/// consumers.
#[derive(Clone, Debug)]
pub struct Waveform {
    /// Header metadata.
    pub metadata: Metadata,
    /// Scope arena; `root` and the `ScopeId` links index into this.
    pub scopes: Vec<Scope>,
    /// The synthetic root scope.
    pub root: ScopeId,
    /// All declared variables, in declaration order across the whole file.
    pub variables: Vec<Variable>,
}

impl Waveform {
    /// Returns the scope for `id`, or `None` for an id outside the arena.
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.as_raw() as usize)
    }

    /// Returns the variable for `id`, or `None` for an id outside the table.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.as_raw() as usize)
    }

    /// Returns the dot-joined hierarchical path of a scope.
    ///
    /// The path runs from the first scope below the synthetic root down to
    /// `id` itself (e.g. `top.core.alu`). The root's own name is excluded,
    /// so the root and any invalid id yield an empty string.
    pub fn full_path(&self, id: ScopeId) -> String {
        let mut names: Vec<&str> = Vec::new();
        let mut cursor = self.scope(id);
        while let Some(scope) = cursor {
            if scope.parent.is_none() {
                break; // synthetic root, excluded from paths
            }
            names.push(&scope.name);
            cursor = scope.parent.and_then(|p| self.scope(p));
        }
        names.reverse();
        names.join(".")
    }

    /// Resolves a dot-joined path (as produced by [`Self::full_path`]) back
    /// to a scope id, or `None` when no scope matches.
    pub fn find_scope(&self, path: &str) -> Option<ScopeId> {
        let mut current = self.root;
        for name in path.split('.').filter(|s| !s.is_empty()) {
            let scope = self.scope(current)?;
            current = *scope
                .children
                .iter()
                .find(|&&child| self.scope(child).is_some_and(|s| s.name == name))?;
        }
        Some(current)
    }
}

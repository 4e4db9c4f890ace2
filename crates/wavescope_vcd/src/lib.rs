//! VCD trace ingestion for the wavescope waveform debugger.
//!
//! This crate loads a Value Change Dump file into an immutable in-memory
//! model: the scope hierarchy, the flat variable table, and each
//! variable's chronological value-change sequence. Tokenization is
//! delegated to the `vcd` crate; this crate owns the single-pass
//! hierarchy build and the identifier-code resolution that fans one
//! change sequence out to every variable declaring the same code.
//!
//! # Usage
//!
//! ```ignore
//! let wave = wavescope_vcd::load_file(Path::new("trace.vcd"))?;
//! for var in &wave.variables {
//!     println!("{} ({} changes)", var.reference, var.changes.len());
//! }
//! ```
//!
//! # Modules
//!
//! - `error` — Load error types
//! - `hierarchy` — Scope tree, variable table, and metadata model
//! - `loader` — Single-pass hierarchy builder over the token stream

#![warn(missing_docs)]

pub mod error;
pub mod hierarchy;
pub mod loader;

pub use error::LoadError;
pub use hierarchy::{
    ChangeValue, Metadata, Scope, ScopeId, ValueChange, VarId, Variable, Waveform,
};
pub use loader::{load_file, load_tokens};

//! Error types for VCD trace loading.

use std::io;

/// Errors that can occur while loading a VCD trace.
///
/// Every failure aborts the whole load; there is no partial-success mode.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or the token stream was malformed.
    ///
    /// The tokenizer reports syntax problems as `io::Error` values of kind
    /// `InvalidData`, so both resource failures and malformed input arrive
    /// through this variant.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An `$upscope` appeared while the current scope was already the root.
    #[error("unbalanced $upscope: already at the root scope")]
    UnbalancedUpscope,
}

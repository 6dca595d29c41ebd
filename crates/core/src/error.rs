//! Fatal errors raised while synthesizing a document.
//!
//! Generation is all-or-nothing: any of these aborts the run. Name collisions
//! are not errors, they are reported as [`crate::Diagnostic`] values.

use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// A `$ref` outside the four supported component roots.
    #[error("unsupported reference `{0}`: only #/components/{{schemas,responses,parameters,requestBodies}}/<key> are supported")]
    UnsupportedReference(String),
    /// A `$ref` to a supported root whose key does not exist.
    #[error("dangling reference `{0}`: no such component")]
    DanglingReference(String),
    /// The document could not be decoded.
    #[error("failed to parse API document: {0}")]
    Parse(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

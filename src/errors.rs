//! Unified, `miette`-based diagnostics for Graft.
//!
//! The rewrite itself is total: an ineligible or malformed node is forwarded
//! unchanged, never reported. Errors exist only at the configuration edge
//! (rule construction and registration) and when decoding trees handed over
//! in serde interchange form.

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Graft failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum GraftError {
    /// A suffix that cannot be appended to a module specifier.
    #[error("invalid suffix `{suffix}`: {reason}")]
    #[diagnostic(
        code(graft::invalid_suffix),
        help("the suffix is appended verbatim to the specifier; use a value like `.js`")
    )]
    InvalidSuffix { suffix: String, reason: String },

    /// Two rules registered under the same name in one environment.
    #[error("a rule named `{name}` is already registered")]
    #[diagnostic(
        code(graft::duplicate_rule),
        help("rule names are unique within an environment; pick another name")
    )]
    DuplicateRule { name: String },

    /// A syntax tree payload that does not decode into a source unit.
    #[error("malformed syntax tree payload")]
    #[diagnostic(code(graft::malformed_tree))]
    Decode(#[from] serde_json::Error),
}

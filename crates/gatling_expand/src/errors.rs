//! Expansion-time wiring errors and their diagnostic codes.
//!
//! These are the `E2xx` range: distinct from parse errors because they
//! always indicate a logic bug in the source's wiring, not its syntax.

use gatling_diagnostics::{Category, Diagnostic, DiagnosticCode};
use gatling_netlist::Wire;
use gatling_source::Span;

/// An output slot was bound to two different wires in one expansion.
pub const E201: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// Port count handed to `expand` does not match the macro's declaration.
pub const E202: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 202,
};

/// A primitive gate name has no binary gate-array equivalent.
pub const E203: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 203,
};

/// A primitive's port shape does not fit the two-input, one-output model.
pub const E204: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 204,
};

/// Errors raised while expanding macros or emitting the result.
///
/// All variants are fatal; expansion never recovers or retries.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// A frame slot was reconciled against a different wire than it already
    /// holds. Always a wiring bug in the source.
    #[error("output `{arg}` of `{name}` bound to two different wires ({first} and {second})")]
    WiringConflict {
        /// Name of the macro whose slot conflicted.
        name: String,
        /// Name of the conflicting argument.
        arg: String,
        /// The wire the slot was already bound to.
        first: Wire,
        /// The different wire the unification tried to bind.
        second: Wire,
        /// Location of the offending body statement.
        span: Span,
    },

    /// `expand` was called with the wrong number of input or output wires.
    #[error("`{name}` declares {expected} {direction} wires, {got} supplied")]
    PortMismatch {
        /// The macro name.
        name: String,
        /// `"input"` or `"output"`.
        direction: &'static str,
        /// Declared count.
        expected: usize,
        /// Supplied count.
        got: usize,
    },

    /// Binary emission hit a primitive that is neither NAND nor OR.
    #[error("primitive `{name}` has no binary gate equivalent (expected `Nand` or `Or`)")]
    UnknownPrimitive {
        /// The primitive's name.
        name: String,
    },

    /// Binary emission hit a primitive without exactly two inputs and one
    /// output.
    #[error("primitive `{name}` has {got} ports, binary gates need 3 (two inputs, one output)")]
    BadPrimitiveShape {
        /// The primitive's name.
        name: String,
        /// Number of ports on the record.
        got: usize,
    },
}

impl ExpandError {
    /// Converts this error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ExpandError::WiringConflict { span, .. } => {
                Diagnostic::error(E201, self.to_string(), *span)
                    .with_note("each output may be driven by exactly one wire per expansion")
            }
            ExpandError::PortMismatch { .. } => {
                Diagnostic::error(E202, self.to_string(), Span::DUMMY)
            }
            ExpandError::UnknownPrimitive { .. } => {
                Diagnostic::error(E203, self.to_string(), Span::DUMMY)
                    .with_help("use `--emit text` for custom primitives")
            }
            ExpandError::BadPrimitiveShape { .. } => {
                Diagnostic::error(E204, self.to_string(), Span::DUMMY)
            }
        }
    }
}

//! Diagnostic codes and constructor helpers for HDL parse errors.
//!
//! Error codes `E101`--`E111` cover the parser. Expansion-time wiring errors
//! use the `E2xx` range in `gatling_expand`.

use gatling_diagnostics::{Category, Diagnostic, DiagnosticCode};
use gatling_source::Span;

/// Unknown or misplaced directive.
pub const E101: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 101,
};

/// Duplicate argument name in a declaration list.
pub const E102: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 102,
};

/// Undefined argument name in a body statement.
pub const E103: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 103,
};

/// Body statement argument count does not match the callee's ports.
pub const E104: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 104,
};

/// Required header fields missing at `Begin`.
pub const E105: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 105,
};

/// Truth table declared with too many inputs.
pub const E106: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 106,
};

/// Header field out of order or repeated.
pub const E107: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 107,
};

/// Reference to an undefined macro.
pub const E108: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 108,
};

/// Duplicate macro definition name.
pub const E109: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 109,
};

/// Source ended inside a truth table.
pub const E110: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 110,
};

/// Composite macro never reached `Begin`.
pub const E111: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 111,
};

/// Creates a diagnostic for an unknown or misplaced directive.
pub fn error_unexpected(what: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E101, what.to_string(), span)
}

/// Creates a diagnostic for a duplicate argument name.
pub fn error_duplicate_argument(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E102, format!("duplicate argument `{name}`"), span)
}

/// Creates a diagnostic for an undefined argument reference.
pub fn error_undefined_argument(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E103, format!("undefined argument `{name}`"), span)
        .with_help("declare it under Inputs, Outputs, or Intermediates")
}

/// Creates a diagnostic for an argument count mismatch.
pub fn error_argument_count(callee: &str, expected: usize, got: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E104,
        format!("`{callee}` takes {expected} arguments, {got} supplied"),
        span,
    )
}

/// Creates a diagnostic naming every missing header field.
pub fn error_missing_fields(name: &str, missing: &[&str], span: Span) -> Diagnostic {
    Diagnostic::error(
        E105,
        format!(
            "definition of `{name}` is missing required fields: {}",
            missing.join(", ")
        ),
        span,
    )
}

/// Creates a diagnostic for an oversized truth table.
pub fn error_table_too_large(inputs: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E106,
        format!("truth table with {inputs} inputs is too large (limit 7)"),
        span,
    )
}

/// Creates a diagnostic for an undefined macro reference.
pub fn error_unknown_macro(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E108, format!("unknown macro `{name}`"), span)
        .with_help("macros must be defined before they are referenced")
}

/// Creates a diagnostic for a duplicate definition name.
pub fn error_duplicate_macro(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E109, format!("`{name}` is already defined"), span)
}

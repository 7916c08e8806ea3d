//! Directive parser building the macro table from line-oriented source.
//!
//! Per definition the parser moves `Idle → Header` (on `Gate`/`Macro`),
//! `Header → Body` (on `Begin`), and back to `Idle` on `End`, or implicitly
//! when the next `Gate`/`Macro` starts or the source ends. Bare identifiers
//! in `Idle` are top-level expansion requests; inside a body they are
//! instance statements referencing a previously defined macro.
//!
//! The first malformed construct aborts the parse: its diagnostic goes to
//! the sink and [`ParseAborted`] is returned. Nothing is recovered.

use gatling_common::{Ident, Interner};
use gatling_diagnostics::DiagnosticSink;
use gatling_source::{FileId, Span};

use crate::errors;
use crate::table::{ArgId, Instance, MacroDef, MacroId, MacroKind, MacroTable};
use crate::token::{tokenize, Line, Token};

/// Marker error: parsing stopped at the first malformed construct.
///
/// The actual diagnostic has already been emitted to the [`DiagnosticSink`].
#[derive(Debug, thiserror::Error)]
#[error("parse aborted; see diagnostics")]
pub struct ParseAborted;

/// A top-level expansion request: a bare instantiation outside any body.
///
/// The arguments are source names, not declared ports of anything; the
/// expander binds them to freshly allocated wires and the text emitter
/// prints them back by name.
#[derive(Clone, Debug)]
pub struct TopRequest {
    /// The macro to expand.
    pub callee: MacroId,
    /// Source names for the callee's inputs and outputs, in port order.
    pub formals: Vec<Ident>,
    /// Location of the request line.
    pub span: Span,
}

/// The parsed result: the macro table and the top-level requests, in order.
pub struct Program {
    /// All definitions from the source.
    pub table: MacroTable,
    /// Top-level expansion requests in source order.
    pub requests: Vec<TopRequest>,
}

/// Parses macro source into a [`Program`].
///
/// Any malformed construct emits one line-numbered diagnostic to `sink` and
/// aborts with [`ParseAborted`].
pub fn parse(
    source: &str,
    file: FileId,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<Program, ParseAborted> {
    let lines = tokenize(source, file);
    let mut parser = Parser {
        interner,
        sink,
        table: MacroTable::new(),
        requests: Vec::new(),
        current: None,
    };

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        i += 1;
        if line.is_blank() {
            continue;
        }
        // "Truth table" consumes following lines; everything else is 1 line.
        if line.tokens[0].text == "Truth" {
            let skip = parser.truth_table(line)?;
            if i + skip > lines.len() {
                parser.fail(
                    gatling_diagnostics::Diagnostic::error(
                        errors::E110,
                        "source ended inside truth table",
                        line.span,
                    ),
                )?;
            }
            i += skip;
        } else {
            parser.line(line)?;
        }
    }
    parser.finish(file, source.len() as u32)?;

    Ok(Program {
        table: parser.table,
        requests: parser.requests,
    })
}

/// A definition being accumulated between its header line and its close.
struct Pending {
    name: Ident,
    name_text: String,
    is_gate: bool,
    inputs: Vec<Ident>,
    outputs: Vec<Ident>,
    intermediates: Vec<Ident>,
    seen_inputs: bool,
    seen_outputs: bool,
    seen_intermediates: bool,
    /// `Some(true)` for `Sequential`, `Some(false)` for a truth table.
    behavior: Option<bool>,
    in_body: bool,
    body: Vec<Instance>,
    span: Span,
}

struct Parser<'a> {
    interner: &'a Interner,
    sink: &'a DiagnosticSink,
    table: MacroTable,
    requests: Vec<TopRequest>,
    current: Option<Pending>,
}

impl Parser<'_> {
    /// Emits the diagnostic and aborts.
    fn fail(&self, diag: gatling_diagnostics::Diagnostic) -> Result<(), ParseAborted> {
        self.sink.emit(diag);
        Err(ParseAborted)
    }

    fn line(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let first = line.tokens[0];
        match first.text {
            "Gate" | "Macro" => self.start_definition(line),
            "Inputs" | "Outputs" | "Intermediates" => self.header_field(line),
            "Sequential" => self.sequential(line),
            "Begin" => self.begin(line),
            "End" => self.end(line),
            _ => self.bare_statement(line),
        }
    }

    fn start_definition(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        self.close_current(line.span)?;

        let is_gate = line.tokens[0].text == "Gate";
        let name_tok = match line.tokens.get(1) {
            Some(t) => *t,
            None => {
                return self.fail(errors::error_unexpected(
                    &format!("expected a name after `{}`", line.tokens[0].text),
                    line.span,
                ))
            }
        };
        if line.tokens.len() > 2 {
            return self.fail(errors::error_unexpected(
                "unexpected tokens after definition name",
                line.tokens[2].span,
            ));
        }

        let name = self.interner.get_or_intern(name_tok.text);
        if self.table.lookup(name).is_some() {
            return self.fail(errors::error_duplicate_macro(name_tok.text, name_tok.span));
        }

        self.current = Some(Pending {
            name,
            name_text: name_tok.text.to_string(),
            is_gate,
            inputs: Vec::new(),
            outputs: Vec::new(),
            intermediates: Vec::new(),
            seen_inputs: false,
            seen_outputs: false,
            seen_intermediates: false,
            behavior: None,
            in_body: false,
            body: Vec::new(),
            span: line.span,
        });
        Ok(())
    }

    fn header_field(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let field = line.tokens[0].text;
        let span = line.tokens[0].span;

        let Some(def) = self.current.as_mut() else {
            return self.fail(errors::error_unexpected(
                &format!("`{field}` outside a definition"),
                span,
            ));
        };
        if def.in_body {
            return self.fail(errors::error_unexpected(
                &format!("`{field}` inside a body"),
                span,
            ));
        }

        // Enforce declaration order and reject repeats.
        let out_of_order = match field {
            "Inputs" => def.seen_inputs || def.seen_outputs || def.seen_intermediates,
            "Outputs" => def.seen_outputs || def.seen_intermediates,
            _ => def.seen_intermediates,
        };
        if out_of_order {
            return self.fail(gatling_diagnostics::Diagnostic::error(
                errors::E107,
                format!("`{field}` repeated or out of order (Inputs, Outputs, Intermediates)"),
                span,
            ));
        }

        let mut names = Vec::with_capacity(line.tokens.len() - 1);
        for tok in &line.tokens[1..] {
            let name = self.interner.get_or_intern(tok.text);
            let def = self.current.as_ref().unwrap();
            let dup = def.inputs.contains(&name)
                || def.outputs.contains(&name)
                || def.intermediates.contains(&name)
                || names.contains(&name);
            if dup {
                return self.fail(errors::error_duplicate_argument(tok.text, tok.span));
            }
            names.push(name);
        }

        let def = self.current.as_mut().unwrap();
        match field {
            "Inputs" => {
                def.inputs = names;
                def.seen_inputs = true;
            }
            "Outputs" => {
                def.outputs = names;
                def.seen_outputs = true;
            }
            _ => {
                def.intermediates = names;
                def.seen_intermediates = true;
            }
        }
        Ok(())
    }

    /// Handles a `Truth table` directive and returns how many following
    /// lines to skip (the table is line-counted, never interpreted).
    fn truth_table(&mut self, line: &Line<'_>) -> Result<usize, ParseAborted> {
        let span = line.span;
        if line.tokens.len() != 2 || line.tokens[1].text != "table" {
            self.sink
                .emit(errors::error_unexpected("expected `Truth table`", span));
            return Err(ParseAborted);
        }
        let def = match self.current.as_mut() {
            Some(def) if !def.is_gate && !def.in_body => def,
            Some(_) => {
                self.sink.emit(errors::error_unexpected(
                    "`Truth table` is only valid in a macro header",
                    span,
                ));
                return Err(ParseAborted);
            }
            None => {
                self.sink.emit(errors::error_unexpected(
                    "`Truth table` outside a definition",
                    span,
                ));
                return Err(ParseAborted);
            }
        };
        if !def.seen_inputs {
            self.sink.emit(gatling_diagnostics::Diagnostic::error(
                errors::E107,
                "`Truth table` requires `Inputs` to be declared first",
                span,
            ));
            return Err(ParseAborted);
        }
        let inputs = def.inputs.len() as u32;
        if inputs >= 8 {
            self.sink.emit(errors::error_table_too_large(inputs, span));
            return Err(ParseAborted);
        }
        def.behavior = Some(false);
        Ok(1 + (1usize << inputs))
    }

    fn sequential(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let span = line.tokens[0].span;
        let Some(def) = self.current.as_mut() else {
            return self.fail(errors::error_unexpected(
                "`Sequential` outside a definition",
                span,
            ));
        };
        if def.is_gate || def.in_body {
            return self.fail(errors::error_unexpected(
                "`Sequential` is only valid in a macro header",
                span,
            ));
        }
        def.behavior = Some(true);
        Ok(())
    }

    fn begin(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let span = line.tokens[0].span;
        let Some(def) = self.current.as_mut() else {
            return self.fail(errors::error_unexpected("`Begin` outside a definition", span));
        };
        if def.is_gate {
            return self.fail(errors::error_unexpected(
                "a primitive gate cannot have a body",
                span,
            ));
        }
        if def.in_body {
            return self.fail(errors::error_unexpected("nested `Begin`", span));
        }

        let mut missing = Vec::new();
        if !def.seen_inputs {
            missing.push("Inputs");
        }
        if !def.seen_outputs {
            missing.push("Outputs");
        }
        if def.behavior.is_none() {
            missing.push("Truth table or Sequential");
        }
        if !missing.is_empty() {
            let name = def.name_text.clone();
            return self.fail(errors::error_missing_fields(&name, &missing, span));
        }

        def.in_body = true;
        Ok(())
    }

    fn end(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let span = line.tokens[0].span;
        let in_body = self.current.as_ref().is_some_and(|def| def.in_body);
        if in_body {
            self.finalize()
        } else {
            self.fail(errors::error_unexpected("`End` without a body", span))
        }
    }

    fn bare_statement(&mut self, line: &Line<'_>) -> Result<(), ParseAborted> {
        let callee_tok = line.tokens[0];
        match self.current.as_ref().map(|def| def.in_body) {
            None => self.top_request(callee_tok, &line.tokens[1..], line.span),
            Some(true) => self.body_statement(callee_tok, &line.tokens[1..], line.span),
            Some(false) => self.fail(errors::error_unexpected(
                &format!(
                    "expected a header directive or `Begin`, found `{}`",
                    callee_tok.text
                ),
                callee_tok.span,
            )),
        }
    }

    fn top_request(
        &mut self,
        callee_tok: Token<'_>,
        args: &[Token<'_>],
        span: Span,
    ) -> Result<(), ParseAborted> {
        let name = self.interner.get_or_intern(callee_tok.text);
        let Some(callee) = self.table.lookup(name) else {
            return self.fail(errors::error_unknown_macro(callee_tok.text, callee_tok.span));
        };
        let expected = self.table.get(callee).port_count();
        if args.len() != expected {
            return self.fail(errors::error_argument_count(
                callee_tok.text,
                expected,
                args.len(),
                span,
            ));
        }
        let formals = args
            .iter()
            .map(|t| self.interner.get_or_intern(t.text))
            .collect();
        self.requests.push(TopRequest {
            callee,
            formals,
            span,
        });
        Ok(())
    }

    fn body_statement(
        &mut self,
        callee_tok: Token<'_>,
        args: &[Token<'_>],
        span: Span,
    ) -> Result<(), ParseAborted> {
        let name = self.interner.get_or_intern(callee_tok.text);
        let Some(callee) = self.table.lookup(name) else {
            return self.fail(errors::error_unknown_macro(callee_tok.text, callee_tok.span));
        };
        let expected = self.table.get(callee).port_count();
        if args.len() != expected {
            return self.fail(errors::error_argument_count(
                callee_tok.text,
                expected,
                args.len(),
                span,
            ));
        }

        let mut actuals = Vec::with_capacity(args.len());
        for tok in args {
            let arg_name = self.interner.get_or_intern(tok.text);
            let def = self.current.as_ref().unwrap();
            let resolved = find_pending_arg(def, arg_name);
            match resolved {
                Some(id) => actuals.push(id),
                None => {
                    return self.fail(errors::error_undefined_argument(tok.text, tok.span));
                }
            }
        }

        self.current.as_mut().unwrap().body.push(Instance {
            callee,
            actuals,
            span,
        });
        Ok(())
    }

    /// Closes the current definition before a new one starts.
    fn close_current(&mut self, next_span: Span) -> Result<(), ParseAborted> {
        let (is_gate, in_body) = match self.current.as_ref() {
            None => return Ok(()),
            Some(def) => (def.is_gate, def.in_body),
        };
        if is_gate {
            self.finalize_gate(next_span)
        } else if in_body {
            self.finalize()
        } else {
            let def = self.current.as_ref().unwrap();
            let name = def.name_text.clone();
            let span = def.span;
            self.fail(gatling_diagnostics::Diagnostic::error(
                errors::E111,
                format!("macro `{name}` has no body"),
                span,
            ))
        }
    }

    /// Gates have no `Begin`; their required fields are checked at close.
    fn finalize_gate(&mut self, close_span: Span) -> Result<(), ParseAborted> {
        let def = self.current.as_ref().unwrap();
        let mut missing = Vec::new();
        if !def.seen_inputs {
            missing.push("Inputs");
        }
        if !def.seen_outputs {
            missing.push("Outputs");
        }
        if !missing.is_empty() {
            let name = def.name_text.clone();
            return self.fail(errors::error_missing_fields(&name, &missing, close_span));
        }
        self.finalize()
    }

    fn finalize(&mut self) -> Result<(), ParseAborted> {
        let def = self.current.take().unwrap();
        let kind = if def.is_gate {
            MacroKind::Primitive
        } else {
            MacroKind::Composite {
                sequential: def.behavior.unwrap_or(false),
            }
        };
        let num_inputs = def.inputs.len() as u32;
        let num_outputs = def.outputs.len() as u32;
        let num_intermediates = def.intermediates.len() as u32;
        let mut args = def.inputs;
        args.extend(def.outputs);
        args.extend(def.intermediates);

        let inserted = self.table.insert(MacroDef {
            name: def.name,
            kind,
            args,
            num_inputs,
            num_outputs,
            num_intermediates,
            body: def.body,
            span: def.span,
        });
        // Duplicates were rejected at the header line.
        debug_assert!(inserted.is_some());
        Ok(())
    }

    /// End of source: close whatever is still open.
    fn finish(&mut self, file: FileId, end: u32) -> Result<(), ParseAborted> {
        if self.current.is_none() {
            return Ok(());
        }
        self.close_current(Span::new(file, end, end))
    }
}

/// Resolves a name against a definition still being built.
fn find_pending_arg(def: &Pending, name: Ident) -> Option<ArgId> {
    let mut index = 0u32;
    for list in [&def.inputs, &def.outputs, &def.intermediates] {
        for &arg in list {
            if arg == name {
                return Some(ArgId::from_raw(index));
            }
            index += 1;
        }
    }
    None
}

//! The expansion context: wire allocator, record sink, and the recursive
//! frame machinery.
//!
//! All expansion state is explicit and local to one [`ExpansionContext`];
//! there are no process-wide tables or counters, so tests (and callers)
//! can run isolated expansions side by side.

use gatling_common::{Ident, Interner};
use gatling_hdl::{ArgClass, ArgId, Instance, MacroDef, MacroId, MacroKind, MacroTable, TopRequest};
use gatling_netlist::Wire;
use gatling_source::Span;

use crate::errors::ExpandError;

/// One emitted primitive instantiation: the gate's name and its resolved
/// port wires, inputs first then outputs, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateRecord {
    /// The primitive's declared name (e.g. `Nand`).
    pub name: Ident,
    /// Resolved port wires: inputs, then outputs.
    pub args: Vec<Wire>,
}

/// A finished expansion: the flat record stream plus naming metadata.
#[derive(Clone, Debug, Default)]
pub struct Expansion {
    /// Gate records in emission order.
    pub records: Vec<GateRecord>,
    /// Wires bound to the outermost requests' formal arguments, with their
    /// source names, in binding order. The text emitter prints these wires
    /// by name.
    pub named: Vec<(Wire, Ident)>,
    /// Total wires allocated (wire ids are dense, starting at 0).
    pub num_wires: u32,
}

/// Mutable state threaded through one compilation's expansions.
///
/// Owns the wire allocator and the emitted record stream. Wire ids only ever
/// grow; nothing is freed or reused, so identical inputs produce identical
/// allocation order on every run.
pub struct ExpansionContext<'a> {
    table: &'a MacroTable,
    interner: &'a Interner,
    next_wire: u32,
    records: Vec<GateRecord>,
    named: Vec<(Wire, Ident)>,
}

/// One active composite instantiation.
///
/// Inputs are always concrete; outputs and intermediates start out
/// unassigned and are bound at most once each.
struct Frame<'a> {
    def: &'a MacroDef,
    inputs: &'a [Wire],
    outputs: Vec<Option<Wire>>,
    intermediates: Vec<Option<Wire>>,
}

impl<'a> ExpansionContext<'a> {
    /// Creates a fresh context with an empty record stream and a wire
    /// allocator starting at zero.
    pub fn new(table: &'a MacroTable, interner: &'a Interner) -> Self {
        Self {
            table,
            interner,
            next_wire: 0,
            records: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Allocates a fresh wire. The id space only grows.
    fn alloc_wire(&mut self) -> Wire {
        let wire = Wire::from_raw(self.next_wire);
        self.next_wire += 1;
        wire
    }

    /// Expands one top-level request, binding its formal names to wires.
    ///
    /// Formals resolve by name within the request: a repeated name is the
    /// same wire, which allows feedback at the outermost level too.
    pub fn expand_request(&mut self, request: &TopRequest) -> Result<(), ExpandError> {
        let def = self.table.get(request.callee);
        let n_in = def.num_inputs as usize;

        // Name → wire bindings local to this request.
        let mut bindings: Vec<(Ident, Wire)> = Vec::new();

        let mut inputs = Vec::with_capacity(n_in);
        for &name in &request.formals[..n_in] {
            let wire = match bindings.iter().find(|(n, _)| *n == name) {
                Some(&(_, w)) => w,
                None => {
                    let w = self.alloc_wire();
                    bindings.push((name, w));
                    self.named.push((w, name));
                    w
                }
            };
            inputs.push(wire);
        }

        let out_names = &request.formals[n_in..];
        let outputs: Vec<Option<Wire>> = out_names
            .iter()
            .map(|name| {
                bindings
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|&(_, w)| w)
            })
            .collect();

        let resolved = self.expand(request.callee, &inputs, outputs)?;

        for (&name, wire) in out_names.iter().zip(resolved) {
            match bindings.iter().find(|(n, _)| *n == name) {
                Some(&(_, w)) if w != wire => {
                    return Err(ExpandError::WiringConflict {
                        name: self.interner.resolve(def.name).to_string(),
                        arg: self.interner.resolve(name).to_string(),
                        first: w,
                        second: wire,
                        span: request.span,
                    });
                }
                Some(_) => {}
                None => {
                    bindings.push((name, wire));
                    self.named.push((wire, name));
                }
            }
        }
        Ok(())
    }

    /// Expands one instantiation of `id` into primitive gate records.
    ///
    /// `inputs` must be fully concrete; any `outputs` entry may be `None`,
    /// meaning "allocate a fresh wire and report it". Returns the
    /// now-fully-assigned output wires in declaration order.
    pub fn expand(
        &mut self,
        id: MacroId,
        inputs: &[Wire],
        outputs: Vec<Option<Wire>>,
    ) -> Result<Vec<Wire>, ExpandError> {
        let def = self.table.get(id);
        if inputs.len() != def.num_inputs as usize {
            return Err(self.port_mismatch(def, "input", def.num_inputs, inputs.len()));
        }
        if outputs.len() != def.num_outputs as usize {
            return Err(self.port_mismatch(def, "output", def.num_outputs, outputs.len()));
        }

        match def.kind {
            MacroKind::Primitive => Ok(self.expand_primitive(def, inputs, outputs)),
            MacroKind::Composite { .. } => self.expand_composite(id, inputs, outputs),
        }
    }

    /// Primitive: fresh wires for unassigned outputs, then one record.
    fn expand_primitive(
        &mut self,
        def: &MacroDef,
        inputs: &[Wire],
        outputs: Vec<Option<Wire>>,
    ) -> Vec<Wire> {
        let resolved: Vec<Wire> = outputs
            .into_iter()
            .map(|slot| match slot {
                Some(w) => w,
                None => self.alloc_wire(),
            })
            .collect();

        let mut args = Vec::with_capacity(inputs.len() + resolved.len());
        args.extend_from_slice(inputs);
        args.extend_from_slice(&resolved);
        self.records.push(GateRecord {
            name: def.name,
            args,
        });
        resolved
    }

    /// Composite: open a frame and walk the body in source order.
    fn expand_composite(
        &mut self,
        id: MacroId,
        inputs: &[Wire],
        outputs: Vec<Option<Wire>>,
    ) -> Result<Vec<Wire>, ExpandError> {
        let def = self.table.get(id);
        let mut frame = Frame {
            def,
            inputs,
            outputs,
            intermediates: vec![None; def.num_intermediates as usize],
        };

        for inst in &def.body {
            self.expand_instance(&mut frame, inst)?;
        }

        // Undriven outputs still get wires: the caller is promised a fully
        // assigned result.
        let resolved = frame
            .outputs
            .into_iter()
            .map(|slot| match slot {
                Some(w) => w,
                None => self.alloc_wire(),
            })
            .collect();
        Ok(resolved)
    }

    /// One body statement: resolve actuals, recurse, reconcile outputs.
    fn expand_instance(
        &mut self,
        frame: &mut Frame<'_>,
        inst: &Instance,
    ) -> Result<(), ExpandError> {
        let callee = self.table.get(inst.callee);
        let n_in = callee.num_inputs as usize;

        // Input positions resolve eagerly: referencing a still-unassigned
        // output or intermediate allocates its wire on the spot. This is
        // what lets a statement read an output another statement has not
        // driven yet (SR-latch crisscross).
        let mut call_inputs = Vec::with_capacity(n_in);
        for &arg in &inst.actuals[..n_in] {
            let wire = self.resolve_read(frame, arg);
            call_inputs.push(wire);
        }

        // Output positions pass their current binding through untouched;
        // the callee allocates for any that are still unassigned.
        let out_args = &inst.actuals[n_in..];
        let call_outputs: Vec<Option<Wire>> =
            out_args.iter().map(|&arg| frame.binding(arg)).collect();

        let resolved = self.expand(inst.callee, &call_inputs, call_outputs)?;

        // Reconcile what the callee assigned back into this frame. A slot
        // already bound to a different wire is a wiring bug in the source.
        for (&arg, wire) in out_args.iter().zip(resolved) {
            self.unify(frame, arg, wire, inst.span)?;
        }
        Ok(())
    }

    /// Resolves an actual in input position to a concrete wire.
    fn resolve_read(&mut self, frame: &mut Frame<'_>, arg: ArgId) -> Wire {
        match frame.def.arg_class(arg) {
            ArgClass::Input => frame.inputs[arg.index()],
            ArgClass::Output => {
                let slot = frame.def.output_slot(arg);
                match frame.outputs[slot] {
                    Some(w) => w,
                    None => {
                        let w = self.alloc_wire();
                        frame.outputs[slot] = Some(w);
                        w
                    }
                }
            }
            ArgClass::Intermediate => {
                let slot = frame.def.intermediate_slot(arg);
                match frame.intermediates[slot] {
                    Some(w) => w,
                    None => {
                        let w = self.alloc_wire();
                        frame.intermediates[slot] = Some(w);
                        w
                    }
                }
            }
        }
    }

    /// Binds `arg` to `wire`, or verifies the existing binding matches.
    fn unify(
        &self,
        frame: &mut Frame<'_>,
        arg: ArgId,
        wire: Wire,
        span: Span,
    ) -> Result<(), ExpandError> {
        let slot = match frame.def.arg_class(arg) {
            ArgClass::Input => {
                // Inputs are concrete; the callee drives the caller's wire.
                let existing = frame.inputs[arg.index()];
                if existing != wire {
                    return Err(self.conflict(frame.def, arg, existing, wire, span));
                }
                return Ok(());
            }
            ArgClass::Output => &mut frame.outputs[frame.def.output_slot(arg)],
            ArgClass::Intermediate => {
                &mut frame.intermediates[frame.def.intermediate_slot(arg)]
            }
        };
        match *slot {
            None => {
                *slot = Some(wire);
                Ok(())
            }
            Some(existing) if existing == wire => Ok(()),
            Some(existing) => Err(self.conflict(frame.def, arg, existing, wire, span)),
        }
    }

    fn conflict(
        &self,
        def: &MacroDef,
        arg: ArgId,
        first: Wire,
        second: Wire,
        span: Span,
    ) -> ExpandError {
        ExpandError::WiringConflict {
            name: self.interner.resolve(def.name).to_string(),
            arg: self.interner.resolve(def.args[arg.index()]).to_string(),
            first,
            second,
            span,
        }
    }

    fn port_mismatch(
        &self,
        def: &MacroDef,
        direction: &'static str,
        expected: u32,
        got: usize,
    ) -> ExpandError {
        ExpandError::PortMismatch {
            name: self.interner.resolve(def.name).to_string(),
            direction,
            expected: expected as usize,
            got,
        }
    }

    /// Consumes the context, yielding the finished expansion.
    pub fn finish(self) -> Expansion {
        Expansion {
            records: self.records,
            named: self.named,
            num_wires: self.next_wire,
        }
    }
}

impl Frame<'_> {
    /// Current binding of an actual in output position, without allocating.
    fn binding(&self, arg: ArgId) -> Option<Wire> {
        match self.def.arg_class(arg) {
            ArgClass::Input => Some(self.inputs[arg.index()]),
            ArgClass::Output => self.outputs[self.def.output_slot(arg)],
            ArgClass::Intermediate => self.intermediates[self.def.intermediate_slot(arg)],
        }
    }
}

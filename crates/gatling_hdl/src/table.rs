//! The macro table: named gate and macro definitions.
//!
//! A [`MacroDef`]'s declared ports are numbered by [`ArgId`] in declaration
//! order, partitioned into contiguous input, output, and intermediate ranges.
//! Body statements reference other macros through [`Instance`] records whose
//! actual arguments are `ArgId`s in the *enclosing* macro's numbering.

use std::collections::HashMap;
use std::ops::Range;

use gatling_common::Ident;
use gatling_source::Span;
use serde::{Deserialize, Serialize};

/// Opaque, copyable ID for a macro definition in the [`MacroTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MacroId(u32);

impl MacroId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Position of a declared port within its macro's own argument table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ArgId(u32);

impl ArgId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the raw index as a usize, for slot addressing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which contiguous range of a macro's argument table an [`ArgId`] falls in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgClass {
    /// Declared under `Inputs`.
    Input,
    /// Declared under `Outputs`.
    Output,
    /// Declared under `Intermediates`.
    Intermediate,
}

/// Whether a definition is a primitive gate or a composite macro.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MacroKind {
    /// Declared with `Gate`: expands to a single emitted gate record.
    Primitive,
    /// Declared with `Macro`: expands through its body statements.
    /// `sequential` records whether the definition was marked `Sequential`
    /// rather than carrying a truth table.
    Composite {
        /// `true` if marked `Sequential`, `false` if truth-tabled.
        sequential: bool,
    },
}

/// One body statement: a call of a previously defined macro.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Instance {
    /// The macro being instantiated.
    pub callee: MacroId,
    /// Actual arguments, as `ArgId`s in the enclosing macro's numbering.
    /// Length always equals the callee's declared input+output count.
    pub actuals: Vec<ArgId>,
    /// Source location of the statement.
    pub span: Span,
}

/// A named gate or macro definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MacroDef {
    /// The definition's name.
    pub name: Ident,
    /// Primitive gate or composite macro.
    pub kind: MacroKind,
    /// All declared argument names in declaration order:
    /// inputs, then outputs, then intermediates.
    pub args: Vec<Ident>,
    /// Number of declared inputs.
    pub num_inputs: u32,
    /// Number of declared outputs.
    pub num_outputs: u32,
    /// Number of declared intermediates.
    pub num_intermediates: u32,
    /// Body statements in source order. Empty for primitives.
    pub body: Vec<Instance>,
    /// Source location of the definition header.
    pub span: Span,
}

impl MacroDef {
    /// The `ArgId` range covering declared inputs.
    pub fn input_range(&self) -> Range<u32> {
        0..self.num_inputs
    }

    /// The `ArgId` range covering declared outputs.
    pub fn output_range(&self) -> Range<u32> {
        self.num_inputs..self.num_inputs + self.num_outputs
    }

    /// The `ArgId` range covering declared intermediates.
    pub fn intermediate_range(&self) -> Range<u32> {
        let start = self.num_inputs + self.num_outputs;
        start..start + self.num_intermediates
    }

    /// Classifies an `ArgId` as input, output, or intermediate.
    ///
    /// # Panics
    ///
    /// Panics if the `ArgId` is out of range for this macro.
    pub fn arg_class(&self, arg: ArgId) -> ArgClass {
        let raw = arg.as_raw();
        if self.input_range().contains(&raw) {
            ArgClass::Input
        } else if self.output_range().contains(&raw) {
            ArgClass::Output
        } else if self.intermediate_range().contains(&raw) {
            ArgClass::Intermediate
        } else {
            panic!("ArgId {raw} out of range for macro with {} args", self.args.len());
        }
    }

    /// For an output `ArgId`, its index within the output range.
    pub fn output_slot(&self, arg: ArgId) -> usize {
        (arg.as_raw() - self.num_inputs) as usize
    }

    /// For an intermediate `ArgId`, its index within the intermediate range.
    pub fn intermediate_slot(&self, arg: ArgId) -> usize {
        (arg.as_raw() - self.num_inputs - self.num_outputs) as usize
    }

    /// Number of call-site arguments an instantiation must supply
    /// (inputs + outputs; intermediates are private).
    pub fn port_count(&self) -> usize {
        (self.num_inputs + self.num_outputs) as usize
    }

    /// Resolves a declared argument name to its `ArgId`.
    pub fn find_arg(&self, name: Ident) -> Option<ArgId> {
        self.args
            .iter()
            .position(|&a| a == name)
            .map(|i| ArgId::from_raw(i as u32))
    }
}

/// Registry of all definitions in a compilation session.
///
/// Definitions are appended in source order and never removed; IDs are
/// stable for the lifetime of the table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MacroTable {
    defs: Vec<MacroDef>,
    by_name: HashMap<Ident, MacroId>,
}

impl MacroTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning its ID, or `None` if the name is
    /// already taken.
    pub fn insert(&mut self, def: MacroDef) -> Option<MacroId> {
        if self.by_name.contains_key(&def.name) {
            return None;
        }
        let id = MacroId::from_raw(self.defs.len() as u32);
        self.by_name.insert(def.name, id);
        self.defs.push(def);
        Some(id)
    }

    /// Returns the definition with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: MacroId) -> &MacroDef {
        &self.defs[id.as_raw() as usize]
    }

    /// Looks up a definition by name.
    pub fn lookup(&self, name: Ident) -> Option<MacroId> {
        self.by_name.get(&name).copied()
    }

    /// Number of definitions in the table.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if the table contains no definitions.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterates over `(MacroId, &MacroDef)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (MacroId, &MacroDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (MacroId::from_raw(i as u32), def))
    }
}

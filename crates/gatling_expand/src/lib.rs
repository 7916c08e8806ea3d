//! Recursive macro expansion into flat gate netlists.
//!
//! [`ExpansionContext`] turns top-level instantiation requests into a stream
//! of primitive gate records, resolving every port down to a concrete wire.
//! Composite macros open a transient frame per instantiation; bindings flow
//! through frames by reference identity, with forward references to
//! still-unassigned outputs allocating eagerly so feedback wiring (SR
//! latches and friends) just works. Conflicting rebinding of a slot is an
//! explicit, diagnosable error rather than silent aliasing.
//!
//! The [`emit`] module renders a finished expansion as the textual mnemonic
//! netlist or as the simulator's binary gate files.

#![warn(missing_docs)]

pub mod context;
pub mod emit;
pub mod errors;

pub use context::{Expansion, ExpansionContext, GateRecord};
pub use errors::ExpandError;

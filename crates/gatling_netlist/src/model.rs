//! Wire handles, gate records, and the loaded netlist image.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-bit signal handle: an index into the simulator's state buffers.
///
/// Wire IDs are allocated during macro expansion and never reused; the wire
/// id space only grows. Indices at or above [`Wire::MAX_INDEX`] are reserved
/// for the binary format's sentinels.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Wire(u32);

impl Wire {
    /// The largest representable wire index. The two values above it are the
    /// binary format's end and malformed sentinels.
    pub const MAX_INDEX: u32 = 0xFFFF_FFFD;

    /// Creates a wire handle from a raw index.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this wire.
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the raw index as a usize, for buffer addressing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two primitive gate kinds a netlist can contain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum GateKind {
    /// Two-input NAND: `out = !(in1 & in2)`.
    Nand,
    /// Two-input OR: `out = in1 | in2`.
    Or,
}

impl GateKind {
    /// Evaluates this gate kind on two input bits.
    pub fn eval(self, in1: bool, in2: bool) -> bool {
        match self {
            GateKind::Nand => !(in1 && in2),
            GateKind::Or => in1 || in2,
        }
    }
}

/// One primitive gate instance: two input wires and one output wire.
///
/// Gates are immutable once created, whether emitted by the compiler or
/// loaded from a gate file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Gate {
    /// First input wire.
    pub in1: Wire,
    /// Second input wire.
    pub in2: Wire,
    /// Output wire.
    pub out: Wire,
}

impl Gate {
    /// Creates a gate from three wire handles.
    pub fn new(in1: Wire, in2: Wire, out: Wire) -> Self {
        Self { in1, in2, out }
    }

    /// Returns the largest wire index this gate references.
    pub fn max_wire(&self) -> u32 {
        self.in1.as_raw().max(self.in2.as_raw()).max(self.out.as_raw())
    }
}

/// A complete loaded netlist: the two gate arrays plus the wire count.
///
/// Loaded once before simulation starts and read-only afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NetlistImage {
    /// All NAND gates, in file order.
    pub nands: Vec<Gate>,
    /// All OR gates, in file order.
    pub ors: Vec<Gate>,
    /// One more than the largest wire index referenced across both arrays;
    /// zero for an empty netlist.
    pub num_wires: u32,
}

impl NetlistImage {
    /// Builds an image from gate arrays, computing the wire count.
    pub fn from_gates(nands: Vec<Gate>, ors: Vec<Gate>) -> Self {
        let num_wires = nands
            .iter()
            .chain(ors.iter())
            .map(Gate::max_wire)
            .max()
            .map_or(0, |m| m + 1);
        Self {
            nands,
            ors,
            num_wires,
        }
    }

    /// Total number of gates across both kinds.
    pub fn gate_count(&self) -> usize {
        self.nands.len() + self.ors.len()
    }
}

//! Double-buffered, bit-packed wire state.
//!
//! Two buffers sized to the wire count (rounded up to bytes); "current" and
//! "next" are selected by step-counter parity. One simulation step reads
//! exclusively from the current buffer and writes exclusively to the next,
//! then [`WireStateStore::advance`] flips the roles. Because nothing reads
//! its own writes, per-step evaluation order among gates is irrelevant.

use gatling_netlist::Wire;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// The two bit-packed wire buffers plus the step counter selecting them.
pub struct WireStateStore {
    bufs: [Vec<u8>; 2],
    num_wires: u32,
    step: u64,
}

impl WireStateStore {
    /// Creates a store for `num_wires` wires, seeding both buffers with
    /// pseudo-random noise.
    ///
    /// The first buffer is filled from a [`StdRng`] seeded with `seed`; the
    /// second is its bitwise complement, a cheap stand-in for the
    /// indeterminate state of floating CMOS at power-on. The same seed
    /// always reproduces the same initial state.
    pub fn new(num_wires: u32, seed: u64) -> Self {
        let bytes = num_wires.div_ceil(8) as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut first = vec![0u8; bytes];
        rng.fill_bytes(&mut first);
        let second = first.iter().map(|b| !b).collect();
        Self {
            bufs: [first, second],
            num_wires,
            step: 0,
        }
    }

    /// Number of wires this store covers.
    pub fn num_wires(&self) -> u32 {
        self.num_wires
    }

    /// Steps completed so far.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Reads a wire from the current buffer.
    pub fn get(&self, wire: Wire) -> bool {
        get_bit(&self.bufs[(self.step % 2) as usize], wire)
    }

    /// Writes a wire in the current buffer.
    ///
    /// Used by harnesses to hold otherwise-undriven input wires before a
    /// step; simulation components write through [`StepView`] instead.
    pub fn set(&mut self, wire: Wire, value: bool) {
        set_bit(&mut self.bufs[(self.step % 2) as usize], wire, value);
    }

    /// Splits the store into this step's read-only current buffer and
    /// writable next buffer.
    pub fn view(&mut self) -> StepView<'_> {
        let (a, b) = self.bufs.split_at_mut(1);
        let (old, new) = if self.step % 2 == 0 {
            (a[0].as_slice(), b[0].as_mut_slice())
        } else {
            (b[0].as_slice(), a[0].as_mut_slice())
        };
        StepView { old, new }
    }

    /// Ends the step: the buffer just written becomes current.
    pub fn advance(&mut self) {
        self.step += 1;
    }
}

/// One step's buffer pair: read `old`, write `new`.
pub struct StepView<'a> {
    old: &'a [u8],
    new: &'a mut [u8],
}

impl StepView<'_> {
    /// Reads a wire's value from the previous step.
    pub fn old(&self, wire: Wire) -> bool {
        get_bit(self.old, wire)
    }

    /// Reads a wire's value as computed so far this step.
    ///
    /// Only meaningful for wires a component earlier in the step sequence
    /// has already written (gate outputs, control signals).
    pub fn new_bit(&self, wire: Wire) -> bool {
        get_bit(self.new, wire)
    }

    /// Writes a wire's value for this step.
    pub fn set_new(&mut self, wire: Wire, value: bool) {
        set_bit(self.new, wire, value);
    }
}

fn get_bit(buf: &[u8], wire: Wire) -> bool {
    let i = wire.index();
    (buf[i / 8] >> (i % 8)) & 1 != 0
}

fn set_bit(buf: &mut [u8], wire: Wire, value: bool) {
    let i = wire.index();
    let mask = 1u8 << (i % 8);
    if value {
        buf[i / 8] |= mask;
    } else {
        buf[i / 8] &= !mask;
    }
}

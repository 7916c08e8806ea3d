//! Fixed compile-time bindings from named hardware signals to wire indices.
//!
//! The simulated circuit talks to the outside world through a block of
//! reserved low-numbered wires: the UART occupies wires 0–20 and the
//! control signals wires 21–23. Netlists are free to reference higher
//! wires; the state store is always sized to cover at least this block.

use gatling_netlist::Wire;

/// First wire of the 8-bit input-data latch (device → circuit).
pub const IN_DATA_BASE: u32 = 0;
/// First wire of the 8-bit output-data latch (circuit → device).
pub const OUT_DATA_BASE: u32 = 8;

/// Input clock: the circuit toggles it to request/acknowledge input.
pub const IK: Wire = Wire::from_raw(16);
/// Output clock: the circuit toggles it to transmit the output latch.
pub const OK: Wire = Wire::from_raw(17);
/// Input available, device-driven.
pub const IQ: Wire = Wire::from_raw(18);
/// Output ready, device-driven.
pub const OQ: Wire = Wire::from_raw(19);
/// Input overrun, device-driven.
pub const IR: Wire = Wire::from_raw(20);

/// Reset, generator-driven: high for the first `reset_period` steps.
pub const RESET: Wire = Wire::from_raw(21);
/// Free-running square-wave clock, generator-driven.
pub const CLOCK: Wire = Wire::from_raw(22);
/// Shutdown request, circuit-driven, watched by the generator.
pub const SHUTDOWN: Wire = Wire::from_raw(23);

/// Number of reserved wires; the state store covers at least this many.
pub const WIRE_COUNT: u32 = 24;

/// The wire carrying bit `bit` of the input-data latch.
pub const fn in_data(bit: u8) -> Wire {
    Wire::from_raw(IN_DATA_BASE + bit as u32)
}

/// The wire carrying bit `bit` of the output-data latch.
pub const fn out_data(bit: u8) -> Wire {
    Wire::from_raw(OUT_DATA_BASE + bit as u32)
}

//! The virtual UART: 21 wires bridged to the host streams.
//!
//! Wires 0–7 are the input-data latch (device → circuit), 8–15 the
//! output-data latch (circuit → device), and 16–20 the handshake lines
//! IK/OK/IQ/OQ/IR. The device is edge-triggered on the circuit-driven
//! clocks IK and OK (either polarity), never level-triggered.

use crate::bindings::{in_data, out_data, IK, IQ, IR, OK, OQ};
use crate::error::SimError;
use crate::host::HostIo;
use crate::state::StepView;

/// Receiving this byte on the host input hard-stops the simulation.
pub const QUIT_BYTE: u8 = 0x03; // Ctrl-C

/// The virtual UART device.
///
/// Holds the latched input byte and the handshake flags internally and
/// re-drives its wires every step, so the latch contents persist across
/// steps that gates never touch.
pub struct UartDevice<H> {
    host: H,
    prev_ik: bool,
    prev_ok: bool,
    started: bool,
    input_latch: u8,
    /// Input available: set when a byte is latched, cleared on IK.
    iq: bool,
    /// Output ready: cleared on transmit, reasserted after the countdown.
    oq: bool,
    /// Input overrun: a byte arrived while the previous one was unread.
    ir: bool,
    oq_countdown: u64,
    uart_clock_period: u64,
}

impl<H: HostIo> UartDevice<H> {
    /// Creates the device around a host and its output-ready period.
    pub fn new(host: H, uart_clock_period: u64) -> Self {
        Self {
            host,
            prev_ik: false,
            prev_ok: false,
            started: false,
            input_latch: 0,
            iq: false,
            oq: true,
            ir: false,
            oq_countdown: 0,
            uart_clock_period,
        }
    }

    /// Consumes the device, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Services the device for one step.
    ///
    /// Runs after the cycle engine and control generator, so the IK/OK
    /// levels read here are the ones the circuit computed this step. Device
    /// failures (end-of-stream, the quit byte, write errors) are hard
    /// errors that terminate the run.
    pub fn service(&mut self, view: &mut StepView<'_>) -> Result<(), SimError> {
        let ik = view.new_bit(IK);
        let ok = view.new_bit(OK);

        // First step: latch the levels without treating the pre-randomized
        // noise as an edge.
        if !self.started {
            self.started = true;
            self.prev_ik = ik;
            self.prev_ok = ok;
        }

        // Tick the countdown before edge handling so OQ reasserts exactly
        // `uart_clock_period` steps after the transmit edge.
        if self.oq_countdown > 0 {
            self.oq_countdown -= 1;
            if self.oq_countdown == 0 {
                self.oq = true;
            }
        }

        if ik != self.prev_ik {
            self.prev_ik = ik;
            self.input_clock_edge()?;
        }

        if ok != self.prev_ok {
            self.prev_ok = ok;
            self.output_clock_edge(view)?;
        }

        self.drive_wires(view);
        Ok(())
    }

    /// IK transition: clear IQ/IR, then try to latch a fresh byte.
    fn input_clock_edge(&mut self) -> Result<(), SimError> {
        let unread = self.iq;
        self.iq = false;
        self.ir = false;

        match self.host.read_byte()? {
            Some(QUIT_BYTE) => Err(SimError::QuitRequested),
            Some(byte) => {
                self.input_latch = byte;
                self.iq = true;
                if unread {
                    self.ir = true;
                }
                Ok(())
            }
            // Would block: no byte this step, not an error.
            None => Ok(()),
        }
    }

    /// OK transition: transmit the output latch and restart the OQ countdown.
    fn output_clock_edge(&mut self, view: &StepView<'_>) -> Result<(), SimError> {
        let mut byte = 0u8;
        for bit in 0..8 {
            if view.new_bit(out_data(bit)) {
                byte |= 1 << bit;
            }
        }
        self.host.write_byte(byte)?;
        self.oq = false;
        self.oq_countdown = self.uart_clock_period;
        Ok(())
    }

    /// Re-drives every device-owned wire for this step.
    fn drive_wires(&self, view: &mut StepView<'_>) {
        for bit in 0..8 {
            view.set_new(in_data(bit), (self.input_latch >> bit) & 1 != 0);
        }
        view.set_new(IQ, self.iq);
        view.set_new(OQ, self.oq);
        view.set_new(IR, self.ir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::WIRE_COUNT;
    use crate::host::{ScriptByte, ScriptedHost};
    use crate::state::WireStateStore;

    const PERIOD: u64 = 4;

    struct Rig {
        store: WireStateStore,
        uart: UartDevice<ScriptedHost>,
    }

    impl Rig {
        fn new(host: ScriptedHost) -> Self {
            let mut store = WireStateStore::new(WIRE_COUNT, 0);
            // Quiesce the clock wires so the first captured levels are low.
            store.set(IK, false);
            store.set(OK, false);
            Self {
                store,
                uart: UartDevice::new(host, PERIOD),
            }
        }

        /// One step with the circuit driving IK/OK (and optionally the
        /// output latch).
        fn step_with(&mut self, ik: bool, ok: bool, out_byte: u8) -> Result<(), SimError> {
            let mut view = self.store.view();
            view.set_new(IK, ik);
            view.set_new(OK, ok);
            for bit in 0..8 {
                view.set_new(out_data(bit), (out_byte >> bit) & 1 != 0);
            }
            let result = self.uart.service(&mut view);
            self.store.advance();
            result
        }

        fn step(&mut self, ik: bool, ok: bool) -> Result<(), SimError> {
            self.step_with(ik, ok, 0)
        }

        fn wire(&self, w: gatling_netlist::Wire) -> bool {
            self.store.get(w)
        }

        fn latched_byte(&self) -> u8 {
            let mut b = 0u8;
            for bit in 0..8 {
                if self.wire(in_data(bit)) {
                    b |= 1 << bit;
                }
            }
            b
        }
    }

    #[test]
    fn ik_edge_latches_available_byte() {
        let mut rig = Rig::new(ScriptedHost::new([ScriptByte::Byte(b'G')]));
        rig.step(false, false).unwrap(); // settle, no edge
        assert!(!rig.wire(IQ));
        rig.step(true, false).unwrap(); // rising IK edge
        assert!(rig.wire(IQ));
        assert_eq!(rig.latched_byte(), b'G');
    }

    #[test]
    fn either_polarity_triggers() {
        let mut rig = Rig::new(ScriptedHost::new([
            ScriptByte::Byte(1),
            ScriptByte::Byte(2),
        ]));
        rig.step(true, false).unwrap(); // first step latches level, no edge
        assert!(!rig.wire(IQ));
        rig.step(false, false).unwrap(); // falling edge
        assert_eq!(rig.latched_byte(), 1);
        rig.step(true, false).unwrap(); // rising edge
        assert_eq!(rig.latched_byte(), 2);
    }

    #[test]
    fn level_does_not_retrigger() {
        let mut rig = Rig::new(ScriptedHost::new([
            ScriptByte::Byte(1),
            ScriptByte::Byte(2),
        ]));
        rig.step(false, false).unwrap();
        rig.step(true, false).unwrap();
        assert_eq!(rig.latched_byte(), 1);
        // Holding IK high must not consume the second byte.
        for _ in 0..8 {
            rig.step(true, false).unwrap();
            assert_eq!(rig.latched_byte(), 1);
        }
    }

    #[test]
    fn would_block_is_not_an_error() {
        let mut rig = Rig::new(ScriptedHost::silent());
        rig.step(false, false).unwrap();
        rig.step(true, false).unwrap();
        assert!(!rig.wire(IQ));
        assert!(!rig.wire(IR));
    }

    #[test]
    fn overrun_asserts_ir() {
        let mut rig = Rig::new(ScriptedHost::new([
            ScriptByte::Byte(1),
            ScriptByte::Byte(2),
        ]));
        rig.step(false, false).unwrap();
        rig.step(true, false).unwrap(); // latch 1, IQ up
        assert!(rig.wire(IQ) && !rig.wire(IR));
        rig.step(false, false).unwrap(); // IQ never acknowledged: overrun
        assert!(rig.wire(IQ));
        assert!(rig.wire(IR));
        assert_eq!(rig.latched_byte(), 2);
    }

    #[test]
    fn ik_edge_without_byte_clears_iq() {
        let mut rig = Rig::new(ScriptedHost::new([ScriptByte::Byte(7)]));
        rig.step(false, false).unwrap();
        rig.step(true, false).unwrap();
        assert!(rig.wire(IQ));
        rig.step(false, false).unwrap(); // edge, nothing available
        assert!(!rig.wire(IQ));
        assert!(!rig.wire(IR));
    }

    #[test]
    fn ok_edge_transmits_latched_output() {
        let mut rig = Rig::new(ScriptedHost::silent());
        rig.step_with(false, false, 0).unwrap();
        rig.step_with(false, true, 0xA5).unwrap();
        assert_eq!(rig.uart.host.output, vec![0xA5]);
    }

    #[test]
    fn transmit_happens_exactly_once_per_edge() {
        let mut rig = Rig::new(ScriptedHost::silent());
        rig.step_with(false, false, 0).unwrap();
        rig.step_with(false, true, b'x').unwrap();
        for _ in 0..6 {
            rig.step_with(false, true, b'x').unwrap();
        }
        assert_eq!(rig.uart.host.output, b"x");
    }

    #[test]
    fn oq_clears_then_reasserts_after_period() {
        let mut rig = Rig::new(ScriptedHost::silent());
        rig.step(false, false).unwrap();
        assert!(rig.wire(OQ));
        rig.step(false, true).unwrap(); // transmit
        assert!(!rig.wire(OQ));
        // OQ stays low until PERIOD further steps have run...
        for _ in 0..PERIOD {
            assert!(!rig.wire(OQ));
            rig.step(false, true).unwrap();
        }
        // ...and is reasserted on the PERIOD-th.
        assert!(rig.wire(OQ));
    }

    #[test]
    fn quit_byte_is_hard_failure() {
        let mut rig = Rig::new(ScriptedHost::new([ScriptByte::Byte(QUIT_BYTE)]));
        rig.step(false, false).unwrap();
        let err = rig.step(true, false).unwrap_err();
        assert!(matches!(err, SimError::QuitRequested));
    }

    #[test]
    fn end_of_stream_is_hard_failure() {
        let mut rig = Rig::new(ScriptedHost::silent().close_when_drained());
        rig.step(false, false).unwrap();
        let err = rig.step(true, false).unwrap_err();
        assert!(matches!(err, SimError::InputClosed));
    }

    #[test]
    fn latch_persists_across_steps() {
        let mut rig = Rig::new(ScriptedHost::new([ScriptByte::Byte(0x5A)]));
        rig.step(false, false).unwrap();
        rig.step(true, false).unwrap();
        for _ in 0..16 {
            rig.step(true, false).unwrap();
            assert_eq!(rig.latched_byte(), 0x5A);
        }
    }
}

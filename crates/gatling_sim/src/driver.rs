//! The simulation driver: the main synchronous step loop.

use gatling_config::SimConfig;
use gatling_netlist::{NetlistImage, Wire};

use crate::bindings;
use crate::control::{ControlAction, ControlSignals};
use crate::engine;
use crate::error::SimError;
use crate::host::HostIo;
use crate::state::WireStateStore;
use crate::uart::UartDevice;

/// Why a run stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopCause {
    /// The SHUTDOWN-wire protocol completed.
    Shutdown,
    /// The configured step bound was reached.
    MaxSteps,
}

/// The result of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct SimSummary {
    /// Steps executed.
    pub steps: u64,
    /// Why the run ended.
    pub cause: StopCause,
}

/// Owns the netlist, the wire state, and the attached devices, and runs
/// them in strict sequence each step: cycle engine, control-signal
/// generator, UART device.
///
/// Single-threaded by design; the read-old/write-new buffer discipline is
/// the whole concurrency story.
pub struct Driver<H> {
    image: NetlistImage,
    store: WireStateStore,
    control: ControlSignals,
    uart: UartDevice<H>,
}

impl<H: HostIo> Driver<H> {
    /// Builds a driver for the image with a freshly seeded state store.
    ///
    /// The store covers at least the reserved hardware wires even when the
    /// netlist references fewer.
    pub fn new(image: NetlistImage, config: &SimConfig, seed: u64, host: H) -> Self {
        let num_wires = image.num_wires.max(bindings::WIRE_COUNT);
        Self {
            store: WireStateStore::new(num_wires, seed),
            control: ControlSignals::new(config),
            uart: UartDevice::new(host, config.uart_clock_period),
            image,
        }
    }

    /// Executes one step. Returns the control generator's verdict.
    ///
    /// Device failures propagate immediately; the step counter still
    /// advances so a later resume never reuses a half-written buffer.
    pub fn step(&mut self) -> Result<ControlAction, SimError> {
        let mut view = self.store.view();
        engine::step(&self.image, &mut view);
        let action = self.control.apply(&mut view);
        let device = self.uart.service(&mut view);
        self.store.advance();
        device?;
        Ok(action)
    }

    /// Runs until clean shutdown, a device failure, or `max_steps`.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<SimSummary, SimError> {
        let mut steps = 0u64;
        loop {
            let action = self.step()?;
            steps += 1;
            if action == ControlAction::Shutdown {
                return Ok(SimSummary {
                    steps,
                    cause: StopCause::Shutdown,
                });
            }
            if let Some(limit) = max_steps {
                if steps >= limit {
                    return Ok(SimSummary {
                        steps,
                        cause: StopCause::MaxSteps,
                    });
                }
            }
        }
    }

    /// Reads a wire from the current buffer.
    pub fn wire(&self, wire: Wire) -> bool {
        self.store.get(wire)
    }

    /// Holds a wire in the current buffer, before the next step reads it.
    ///
    /// This is how a harness drives input wires no gate or device owns;
    /// like a floating hardware input, an unheld wire decays to buffer
    /// noise and must be re-asserted every step.
    pub fn set_wire(&mut self, wire: Wire, value: bool) {
        self.store.set(wire, value);
    }

    /// Consumes the driver, returning the host for inspection.
    pub fn into_host(self) -> H {
        self.uart.into_host()
    }
}

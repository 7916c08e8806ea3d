//! The control-signal generator: RESET, CLOCK, and SHUTDOWN handling.

use gatling_config::SimConfig;

use crate::bindings::{CLOCK, RESET, SHUTDOWN};
use crate::state::StepView;

/// What the driver should do after this step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlAction {
    /// Keep stepping.
    Continue,
    /// The shutdown protocol completed; stop cleanly.
    Shutdown,
}

/// Drives RESET and CLOCK each step and watches the SHUTDOWN wire.
///
/// RESET is asserted for the first `reset_period` steps from generator
/// init, then deasserted for the remainder of the run; there is no
/// re-assert mechanism. CLOCK is a free-running square wave, low for the
/// first half and high for the second half of each `clock_period` steps,
/// independent of RESET. SHUTDOWN is ignored while RESET is asserted; once
/// RESET is low, a logic-1 held for `reset_period` consecutive steps
/// requests a clean stop.
pub struct ControlSignals {
    reset_period: u64,
    clock_period: u64,
    step: u64,
    shutdown_run: u64,
}

impl ControlSignals {
    /// Creates a generator with the given timing configuration.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            reset_period: config.reset_period,
            clock_period: config.clock_period,
            step: 0,
            shutdown_run: 0,
        }
    }

    /// Drives the control wires for this step and samples SHUTDOWN.
    ///
    /// Runs after the cycle engine, so the SHUTDOWN value sampled is the
    /// one the circuit computed this step.
    pub fn apply(&mut self, view: &mut StepView<'_>) -> ControlAction {
        let reset = self.step < self.reset_period;
        view.set_new(RESET, reset);

        let phase = self.step % self.clock_period;
        view.set_new(CLOCK, phase >= self.clock_period / 2);

        let action = if reset {
            self.shutdown_run = 0;
            ControlAction::Continue
        } else if view.new_bit(SHUTDOWN) {
            self.shutdown_run += 1;
            if self.shutdown_run >= self.reset_period {
                ControlAction::Shutdown
            } else {
                ControlAction::Continue
            }
        } else {
            self.shutdown_run = 0;
            ControlAction::Continue
        };

        self.step += 1;
        action
    }
}

//! Cycle-based bit-level circuit simulator.
//!
//! Executes a loaded [`NetlistImage`](gatling_netlist::NetlistImage)
//! synchronously: every gate is evaluated once per step against a
//! double-buffered, bit-packed wire state store, so intra-step evaluation
//! order never matters. A control-signal generator drives the RESET and
//! CLOCK wires and watches SHUTDOWN; a virtual UART bridges 21 dedicated
//! wires to real process stdin/stdout with raw-terminal management.
//!
//! Everything runs on one thread in strict sequence; simultaneity is
//! simulated, which is exactly why the double buffering exists.

#![warn(missing_docs)]

pub mod bindings;
pub mod control;
pub mod driver;
pub mod engine;
pub mod error;
pub mod host;
pub mod loader;
pub mod state;
pub mod uart;

pub use control::{ControlAction, ControlSignals};
pub use driver::{Driver, SimSummary, StopCause};
pub use error::SimError;
pub use host::{HostIo, ScriptedHost, TerminalHost};
pub use loader::load_image;
pub use state::{StepView, WireStateStore};
pub use uart::{UartDevice, QUIT_BYTE};

//! Host stream access for the virtual UART.
//!
//! The device talks to the outside world through the [`HostIo`] trait: a
//! non-blocking byte read and a byte write. The real implementation,
//! [`TerminalHost`], puts the terminal into raw (non-canonical, non-echo)
//! mode via crossterm and restores it on every exit path: drop, error, or
//! panic. Tests use [`ScriptedHost`] with a canned input sequence.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::SimError;

/// Byte-level access to the host's input and output streams.
pub trait HostIo {
    /// Attempts to read one byte without blocking.
    ///
    /// `Ok(None)` means no byte is available this step, which is not an
    /// error. A genuine end-of-stream is [`SimError::InputClosed`].
    fn read_byte(&mut self) -> Result<Option<u8>, SimError>;

    /// Writes one byte to the host output stream.
    fn write_byte(&mut self, byte: u8) -> Result<(), SimError>;
}

/// Real terminal I/O in raw mode.
///
/// Construction switches the terminal to non-canonical, non-echo mode with
/// the input made effectively non-blocking (zero-timeout event polling).
/// `Drop` restores the terminal unconditionally; [`install_panic_hook`]
/// covers panics.
pub struct TerminalHost {
    raw: bool,
}

impl TerminalHost {
    /// Enters raw mode and returns the host.
    ///
    /// On a descriptor that is not a terminal, raw mode is skipped and
    /// reads still work through the event stream.
    pub fn new() -> io::Result<Self> {
        let raw = enable_raw_mode().is_ok();
        Ok(Self { raw })
    }
}

impl HostIo for TerminalHost {
    fn read_byte(&mut self) -> Result<Option<u8>, SimError> {
        // Zero-timeout poll: never stalls the simulation loop.
        while event::poll(Duration::ZERO).map_err(SimError::Io)? {
            let Event::Key(key) = event::read().map_err(SimError::Io)? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let byte = match key.code {
                KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    match c.to_ascii_lowercase() {
                        // Ctrl-D is end-of-stream, like a cooked-mode tty.
                        'd' => return Err(SimError::InputClosed),
                        c @ 'a'..='z' => (c as u8) - b'a' + 1,
                        _ => continue,
                    }
                }
                KeyCode::Char(c) if c.is_ascii() => c as u8,
                KeyCode::Enter => b'\r',
                KeyCode::Tab => b'\t',
                KeyCode::Backspace => 0x7f,
                KeyCode::Esc => 0x1b,
                _ => continue,
            };
            return Ok(Some(byte));
        }
        Ok(None)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SimError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&[byte])?;
        stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

/// Installs a panic hook that restores the terminal before printing.
///
/// Without this, a panic mid-simulation would leave the terminal in raw
/// mode and the panic message garbled.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        original_hook(panic_info);
    }));
}

/// One entry of a [`ScriptedHost`] input script.
#[derive(Clone, Copy, Debug)]
pub enum ScriptByte {
    /// A byte is available.
    Byte(u8),
    /// Nothing available this poll (would block).
    Empty,
}

/// Deterministic in-memory host for tests.
///
/// Serves input from a script of available/empty polls; when the script is
/// exhausted, reads report would-block, or end-of-stream if `close_after`
/// was set. All written bytes are captured.
pub struct ScriptedHost {
    input: VecDeque<ScriptByte>,
    close_after: bool,
    /// Bytes the device wrote to the "terminal".
    pub output: Vec<u8>,
}

impl ScriptedHost {
    /// Creates a host with the given input script.
    pub fn new(script: impl IntoIterator<Item = ScriptByte>) -> Self {
        Self {
            input: script.into_iter().collect(),
            close_after: false,
            output: Vec::new(),
        }
    }

    /// Creates a host whose input never has anything available.
    pub fn silent() -> Self {
        Self::new([])
    }

    /// Makes reads fail with end-of-stream once the script is exhausted.
    pub fn close_when_drained(mut self) -> Self {
        self.close_after = true;
        self
    }
}

impl HostIo for ScriptedHost {
    fn read_byte(&mut self) -> Result<Option<u8>, SimError> {
        match self.input.pop_front() {
            Some(ScriptByte::Byte(b)) => Ok(Some(b)),
            Some(ScriptByte::Empty) => Ok(None),
            None if self.close_after => Err(SimError::InputClosed),
            None => Ok(None),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SimError> {
        self.output.push(byte);
        Ok(())
    }
}

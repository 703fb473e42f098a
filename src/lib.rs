// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

//! Read a single keypress from the console, classified into an
//! [`InputEvent`], and query the console buffer dimensions.
//!
//! Both operations are synchronous. [`read_event`] blocks the calling
//! thread until a key is pressed and cannot be interrupted.

mod backend;
mod event;
mod size;
mod tty;

#[cfg(target_family = "windows")]
mod win32;

#[cfg(target_family = "windows")]
mod windows;

#[cfg(target_family = "unix")]
mod unix;

use tracing::{debug, trace, warn};

use crate::event::Step;

pub use crate::backend::RawConsole;
pub use crate::event::InputEvent;
pub use crate::size::TerminalSize;
pub use crate::tty::{isatty, Stream};

#[cfg(any(target_family = "windows", target_family = "unix"))]
pub use crate::backend::SystemConsole;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Standard input is not a console")]
    NotAConsole,
    #[error("Could not switch console mode: {0}")]
    RawMode(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read one keypress from `console` and classify it.
pub fn try_read_event_from<C: RawConsole + ?Sized>(
    console: &mut C,
) -> Result<InputEvent, ConsoleError> {
    let code = console.read_raw_key()?;
    trace!(code, "read raw key");

    let event = match event::classify(code) {
        Step::Done(event) => event,
        Step::ReadScanCode => {
            let scan = console.read_raw_key()?;
            trace!(scan, "read scan code");
            event::classify_extended(scan)
        }
    };

    trace!(?event, "classified keypress");
    Ok(event)
}

/// Read one keypress from `console`. A failed read is reported as
/// [`InputEvent::None`].
pub fn read_event_from<C: RawConsole + ?Sized>(console: &mut C) -> InputEvent {
    match try_read_event_from(console) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "console read failed");
            InputEvent::None
        }
    }
}

/// Query the buffer size of `console`.
pub fn get_dimensions_from<C: RawConsole + ?Sized>(console: &C) -> Option<TerminalSize> {
    let size = console.query_console_size();
    if size.is_none() {
        debug!("console dimensions unavailable");
    }
    size
}

/// Block until a key is pressed on the attached console and classify it.
#[cfg(any(target_family = "windows", target_family = "unix"))]
pub fn try_read_event() -> Result<InputEvent, ConsoleError> {
    try_read_event_from(&mut SystemConsole::new())
}

/// Block until a key is pressed on the attached console and classify it.
/// Read failures are reported as [`InputEvent::None`].
#[cfg(any(target_family = "windows", target_family = "unix"))]
pub fn read_event() -> InputEvent {
    read_event_from(&mut SystemConsole::new())
}

/// The console buffer size as rows and columns. None if there is no
/// console attached to standard output.
#[cfg(any(target_family = "windows", target_family = "unix"))]
pub fn get_dimensions() -> Option<TerminalSize> {
    get_dimensions_from(&SystemConsole::new())
}

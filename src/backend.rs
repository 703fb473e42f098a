// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

use crate::{ConsoleError, TerminalSize};

#[cfg(target_family = "windows")]
pub use crate::windows::SystemConsole;

#[cfg(target_family = "unix")]
pub use crate::unix::SystemConsole;

/// The console facilities the adapter needs from the OS.
///
/// `read_raw_key` blocks until one raw code is available. Arrow and other
/// special keys are reported as an extended-key sentinel (`0` or `224`)
/// followed by a scan code on the next call, the way the Windows CRT
/// reports them.
pub trait RawConsole {
    fn read_raw_key(&mut self) -> Result<u8, ConsoleError>;

    /// Current console buffer size, or None if it cannot be queried.
    fn query_console_size(&self) -> Option<TerminalSize>;
}

impl<C: RawConsole + ?Sized> RawConsole for &mut C {
    fn read_raw_key(&mut self) -> Result<u8, ConsoleError> {
        (**self).read_raw_key()
    }

    fn query_console_size(&self) -> Option<TerminalSize> {
        (**self).query_console_size()
    }
}

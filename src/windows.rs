// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

use crate::win32::{
    GetConsoleScreenBufferInfo, GetStdHandle, _getch, CONSOLE_SCREEN_BUFFER_INFO, FALSE,
    INVALID_HANDLE_VALUE, STD_OUTPUT_HANDLE,
};
use crate::{ConsoleError, RawConsole, TerminalSize};

/// The console attached to this process.
///
/// `_getch` already reports arrow keys as a sentinel followed by a scan
/// code, so raw codes are passed through untouched.
#[derive(Debug, Default)]
pub struct SystemConsole {
    _priv: (),
}

impl SystemConsole {
    pub fn new() -> SystemConsole {
        SystemConsole { _priv: () }
    }
}

impl RawConsole for SystemConsole {
    fn read_raw_key(&mut self) -> Result<u8, ConsoleError> {
        let code = unsafe { _getch() };
        u8::try_from(code).map_err(|_| {
            ConsoleError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unexpected key code {}", code),
            ))
        })
    }

    fn query_console_size(&self) -> Option<TerminalSize> {
        let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) };
        if handle.is_null() || handle == INVALID_HANDLE_VALUE {
            return None;
        }

        let mut info = CONSOLE_SCREEN_BUFFER_INFO::default();
        let ok = unsafe { GetConsoleScreenBufferInfo(handle, &mut info) };
        if ok == FALSE {
            tracing::debug!(
                error = %std::io::Error::last_os_error(),
                "GetConsoleScreenBufferInfo failed"
            );
            return None;
        }

        TerminalSize::from_signed(info.dwSize.Y, info.dwSize.X)
    }
}

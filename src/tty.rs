// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

/// Stream represents the Stdin, Stdout, and Stderr streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

#[cfg(target_family = "windows")]
pub use crate::tty::windows::isatty;

#[cfg(target_family = "unix")]
pub use crate::tty::unix::isatty;

#[cfg(target_family = "windows")]
mod windows {
    use crate::tty::Stream;
    use crate::win32::{
        GetFileType, GetStdHandle, FILE_TYPE_CHAR, STD_ERROR_HANDLE, STD_INPUT_HANDLE,
        STD_OUTPUT_HANDLE,
    };

    #[allow(clippy::let_and_return)]
    /// Returns true if the given stream is a console
    pub fn isatty(stream: Stream) -> bool {
        let handle = unsafe {
            match stream {
                Stream::Stdin => GetStdHandle(STD_INPUT_HANDLE),
                Stream::Stdout => GetStdHandle(STD_OUTPUT_HANDLE),
                Stream::Stderr => GetStdHandle(STD_ERROR_HANDLE),
            }
        };

        let is_atty = unsafe { GetFileType(handle) == FILE_TYPE_CHAR };

        is_atty
    }
}

#[cfg(target_family = "unix")]
mod unix {
    use crate::tty::Stream;
    use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};

    #[allow(clippy::let_and_return)]
    /// Returns true if the given stream is a tty
    pub fn isatty(stream: Stream) -> bool {
        let fd = match stream {
            Stream::Stdin => STDIN_FILENO,
            Stream::Stdout => STDOUT_FILENO,
            Stream::Stderr => STDERR_FILENO,
        };

        let is_atty = unsafe { libc::isatty(fd) == 1 };

        is_atty
    }
}

// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

//! Console access through termios.
//!
//! Terminals report special keys as escape sequences rather than the
//! sentinel and scan code pairs the classifier expects, so each keypress is
//! decoded here and re-encoded in that vocabulary. An arrow key becomes the
//! extended-key sentinel on one call and its scan code on the next.

use std::io;
use std::sync::atomic::{AtomicU16, Ordering};

use libc::{STDIN_FILENO, STDOUT_FILENO};

use crate::event::{
    KEY_ENTER, KEY_ESCAPE, SCAN_DOWN, SCAN_LEFT, SCAN_RIGHT, SCAN_UP, SENTINEL_EXTENDED,
    SENTINEL_NUL,
};
use crate::tty::{isatty, Stream};
use crate::{ConsoleError, RawConsole, TerminalSize};

/// How long to wait for the rest of an escape sequence before treating
/// ESC as a keypress of its own.
const ESCAPE_TIMEOUT_MS: i32 = 50;

/// Scan code for special keys without a mapping. Classifies as None.
const SCAN_UNRECOGNIZED: u8 = 0;

/// The terminal attached to this process.
#[derive(Debug, Default)]
pub struct SystemConsole {
    pending_scan: Option<u8>,
}

impl SystemConsole {
    pub fn new() -> SystemConsole {
        SystemConsole { pending_scan: None }
    }

    /// Next raw code from `src`: the pending scan code if there is one,
    /// otherwise the first code of a freshly decoded keypress.
    fn next_raw<S: ByteSource>(&mut self, src: &mut S) -> io::Result<u8> {
        if let Some(scan) = self.pending_scan.take() {
            return Ok(scan);
        }

        match decode(src)? {
            Key::Code(code) => Ok(code),
            Key::Extended(scan) => {
                self.pending_scan = Some(scan);
                Ok(SENTINEL_EXTENDED)
            }
        }
    }
}

/// Combine a read with the outcome of leaving raw mode. A key that was
/// already read is returned even if the terminal could not be restored.
fn settle(code: io::Result<u8>, restored: Result<(), ConsoleError>) -> Result<u8, ConsoleError> {
    if let Err(e) = restored {
        tracing::warn!(error = %e, "could not restore terminal mode");
    }
    Ok(code?)
}

impl RawConsole for SystemConsole {
    fn read_raw_key(&mut self) -> Result<u8, ConsoleError> {
        // The scan code of the previous keypress needs no terminal access.
        if self.pending_scan.is_some() {
            return Ok(self.next_raw(&mut StdinBytes)?);
        }

        if !isatty(Stream::Stdin) {
            return Err(ConsoleError::NotAConsole);
        }

        let guard = RawModeGuard::enter()?;
        let code = self.next_raw(&mut StdinBytes);
        settle(code, guard.restore())
    }

    fn query_console_size(&self) -> Option<TerminalSize> {
        let mut ws = unsafe { std::mem::zeroed::<libc::winsize>() };
        if unsafe { libc::ioctl(STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == -1 {
            tracing::debug!(error = %io::Error::last_os_error(), "TIOCGWINSZ failed");
            return None;
        }

        Some(TerminalSize::new(ws.ws_row, ws.ws_col))
    }
}

/// Keeps stdin in raw mode until restored or dropped.
struct RawModeGuard {
    saved: libc::termios,
    restored: bool,
}

impl RawModeGuard {
    fn enter() -> Result<RawModeGuard, ConsoleError> {
        let mut saved = unsafe { std::mem::zeroed::<libc::termios>() };
        if unsafe { libc::tcgetattr(STDIN_FILENO, &mut saved) } == -1 {
            return Err(ConsoleError::RawMode(io::Error::last_os_error()));
        }

        let mut raw = saved;
        unsafe { libc::cfmakeraw(&mut raw) };
        // keep output processing so the host's newlines still work
        raw.c_oflag |= libc::OPOST;
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(STDIN_FILENO, libc::TCSANOW, &raw) } == -1 {
            return Err(ConsoleError::RawMode(io::Error::last_os_error()));
        }

        Ok(RawModeGuard {
            saved,
            restored: false,
        })
    }

    fn restore(mut self) -> Result<(), ConsoleError> {
        self.restored = true;
        set_params(&self.saved).map_err(ConsoleError::RawMode)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = set_params(&self.saved) {
            tracing::warn!(error = %e, "could not restore terminal mode");
        }
    }
}

fn set_params(params: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(STDIN_FILENO, libc::TCSANOW, params) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// One decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Code(u8),
    Extended(u8),
}

trait ByteSource {
    /// Block until a byte is available.
    fn next_byte(&mut self) -> io::Result<u8>;

    /// Wait at most `timeout_ms` for a byte.
    fn next_byte_within(&mut self, timeout_ms: i32) -> io::Result<Option<u8>>;

    /// Hand `byte` back so the next read returns it.
    fn unread(&mut self, byte: u8);
}

/// Sentinel for an empty pushback slot. Outside the range of a byte.
const NO_PUSHBACK: u16 = 0x100;

/// A byte read from fd 0 but not yet consumed. Stdin is shared by the
/// whole process, so its pushback slot is too.
static STDIN_PUSHBACK: AtomicU16 = AtomicU16::new(NO_PUSHBACK);

/// Unbuffered reads from fd 0. `std::io::stdin` would buffer ahead and
/// hide pending bytes from `poll`.
struct StdinBytes;

impl StdinBytes {
    fn take_pushback() -> Option<u8> {
        u8::try_from(STDIN_PUSHBACK.swap(NO_PUSHBACK, Ordering::AcqRel)).ok()
    }
}

impl ByteSource for StdinBytes {
    fn next_byte(&mut self) -> io::Result<u8> {
        if let Some(byte) = Self::take_pushback() {
            return Ok(byte);
        }

        let mut byte = 0u8;
        loop {
            let n = unsafe { libc::read(STDIN_FILENO, (&mut byte as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(byte),
                0 => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
                _ => {
                    let e = io::Error::last_os_error();
                    if e.kind() != io::ErrorKind::Interrupted {
                        return Err(e);
                    }
                }
            }
        }
    }

    fn next_byte_within(&mut self, timeout_ms: i32) -> io::Result<Option<u8>> {
        if let Some(byte) = Self::take_pushback() {
            return Ok(Some(byte));
        }

        let mut fds = libc::pollfd {
            fd: STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            match unsafe { libc::poll(&mut fds, 1, timeout_ms) } {
                0 => return Ok(None),
                -1 => {
                    let e = io::Error::last_os_error();
                    if e.kind() != io::ErrorKind::Interrupted {
                        return Err(e);
                    }
                }
                _ => return self.next_byte().map(Some),
            }
        }
    }

    fn unread(&mut self, byte: u8) {
        STDIN_PUSHBACK.store(u16::from(byte), Ordering::Release);
    }
}

fn decode<S: ByteSource>(src: &mut S) -> io::Result<Key> {
    match src.next_byte()? {
        KEY_ESCAPE => decode_escape(src),
        b'\n' => Ok(Key::Code(KEY_ENTER)),
        // Terminals send these as ordinary bytes. Passing them through
        // would make the classifier wait for a scan code that never comes.
        SENTINEL_NUL | SENTINEL_EXTENDED => Ok(Key::Extended(SCAN_UNRECOGNIZED)),
        code => Ok(Key::Code(code)),
    }
}

fn decode_escape<S: ByteSource>(src: &mut S) -> io::Result<Key> {
    let intro = match src.next_byte_within(ESCAPE_TIMEOUT_MS)? {
        Some(b) => b,
        None => return Ok(Key::Code(KEY_ESCAPE)),
    };

    if intro != b'[' && intro != b'O' {
        // Not a sequence. The byte is the next keypress.
        src.unread(intro);
        return Ok(Key::Code(KEY_ESCAPE));
    }

    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7e.
    let final_byte = loop {
        match src.next_byte_within(ESCAPE_TIMEOUT_MS)? {
            Some(b) if (0x40..=0x7e).contains(&b) => break b,
            Some(_) => continue,
            None => return Ok(Key::Extended(SCAN_UNRECOGNIZED)),
        }
    };

    let scan = match final_byte {
        b'A' => SCAN_UP,
        b'B' => SCAN_DOWN,
        b'C' => SCAN_RIGHT,
        b'D' => SCAN_LEFT,
        _ => SCAN_UNRECOGNIZED,
    };
    Ok(Key::Extended(scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{read_event_from, InputEvent};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<u8>);

    impl Scripted {
        fn new(bytes: &[u8]) -> Scripted {
            Scripted(bytes.iter().copied().collect())
        }
    }

    impl ByteSource for Scripted {
        fn next_byte(&mut self) -> io::Result<u8> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }

        fn next_byte_within(&mut self, _timeout_ms: i32) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front())
        }

        fn unread(&mut self, byte: u8) {
            self.0.push_front(byte);
        }
    }

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut src = Scripted::new(bytes);
        let mut keys = Vec::new();
        while !src.0.is_empty() {
            keys.push(decode(&mut src).unwrap());
        }
        keys
    }

    /// Drives the real `SystemConsole` raw-code step from scripted bytes.
    struct ScriptedConsole {
        console: SystemConsole,
        src: Scripted,
    }

    impl RawConsole for ScriptedConsole {
        fn read_raw_key(&mut self) -> Result<u8, ConsoleError> {
            Ok(self.console.next_raw(&mut self.src)?)
        }

        fn query_console_size(&self) -> Option<TerminalSize> {
            None
        }
    }

    #[test]
    fn csi_arrows() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![
                Key::Extended(SCAN_UP),
                Key::Extended(SCAN_DOWN),
                Key::Extended(SCAN_RIGHT),
                Key::Extended(SCAN_LEFT),
            ]
        );
    }

    #[test]
    fn ss3_arrows() {
        assert_eq!(
            decode_all(b"\x1bOA\x1bOD"),
            vec![Key::Extended(SCAN_UP), Key::Extended(SCAN_LEFT)]
        );
    }

    #[test]
    fn modified_arrow_keeps_direction() {
        // ctrl + up
        assert_eq!(decode_all(b"\x1b[1;5A"), vec![Key::Extended(SCAN_UP)]);
    }

    #[test]
    fn other_sequences_are_unrecognized() {
        // delete, then F5
        assert_eq!(
            decode_all(b"\x1b[3~\x1b[15~"),
            vec![
                Key::Extended(SCAN_UNRECOGNIZED),
                Key::Extended(SCAN_UNRECOGNIZED)
            ]
        );
    }

    #[test]
    fn truncated_sequence_is_unrecognized() {
        assert_eq!(decode_all(b"\x1b[1;"), vec![Key::Extended(SCAN_UNRECOGNIZED)]);
    }

    #[test]
    fn lone_escape() {
        assert_eq!(decode_all(b"\x1b"), vec![Key::Code(KEY_ESCAPE)]);
    }

    #[test]
    fn repeated_escape_keeps_every_keypress() {
        assert_eq!(
            decode_all(&[27, 27]),
            vec![Key::Code(KEY_ESCAPE), Key::Code(KEY_ESCAPE)]
        );
        assert_eq!(
            decode_all(&[27, 27, 27]),
            vec![
                Key::Code(KEY_ESCAPE),
                Key::Code(KEY_ESCAPE),
                Key::Code(KEY_ESCAPE)
            ]
        );
    }

    #[test]
    fn escape_then_key_is_two_keypresses() {
        assert_eq!(
            decode_all(&[27, b'q']),
            vec![Key::Code(KEY_ESCAPE), Key::Code(b'q')]
        );
        // alt + x
        assert_eq!(
            decode_all(b"\x1bx"),
            vec![Key::Code(KEY_ESCAPE), Key::Code(b'x')]
        );
        // escape, then an arrow
        assert_eq!(
            decode_all(b"\x1b\x1b[A"),
            vec![Key::Code(KEY_ESCAPE), Key::Extended(SCAN_UP)]
        );
    }

    #[test]
    fn escape_then_quit_both_exit() {
        let mut console = ScriptedConsole {
            console: SystemConsole::new(),
            src: Scripted::new(&[27, b'q', 27, 27]),
        };
        for _ in 0..4 {
            assert_eq!(read_event_from(&mut console), InputEvent::Exit);
        }
        assert!(console.src.0.is_empty());
    }

    #[test]
    fn scan_code_waits_in_the_pending_slot() {
        let mut console = SystemConsole::new();
        let mut src = Scripted::new(b"\x1b[Bz");
        assert_eq!(console.next_raw(&mut src).unwrap(), SENTINEL_EXTENDED);
        assert_eq!(console.pending_scan, Some(SCAN_DOWN));
        assert_eq!(console.next_raw(&mut src).unwrap(), SCAN_DOWN);
        assert_eq!(console.pending_scan, None);
        assert_eq!(console.next_raw(&mut src).unwrap(), b'z');
    }

    #[test]
    fn pending_scan_code_is_returned_without_reading() {
        let mut console = SystemConsole {
            pending_scan: Some(SCAN_LEFT),
        };
        let mut src = Scripted::new(&[]);
        assert_eq!(console.next_raw(&mut src).unwrap(), SCAN_LEFT);
        assert!(console.next_raw(&mut src).is_err());
    }

    #[test]
    fn key_survives_failed_mode_restore() {
        let restored = Err(ConsoleError::RawMode(io::Error::from(
            io::ErrorKind::PermissionDenied,
        )));
        assert_eq!(settle(Ok(b'q'), restored).unwrap(), b'q');
    }

    #[test]
    fn read_error_wins_over_restore_error() {
        let restored = Err(ConsoleError::RawMode(io::Error::from(
            io::ErrorKind::PermissionDenied,
        )));
        let err = settle(Err(io::Error::from(io::ErrorKind::UnexpectedEof)), restored).unwrap_err();
        assert!(matches!(err, ConsoleError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn plain_bytes_pass_through() {
        assert_eq!(
            decode_all(b"\rqA"),
            vec![Key::Code(13), Key::Code(b'q'), Key::Code(b'A')]
        );
    }

    #[test]
    fn line_feed_is_enter() {
        assert_eq!(decode_all(b"\n"), vec![Key::Code(KEY_ENTER)]);
    }

    #[test]
    fn sentinel_bytes_do_not_wait_for_a_scan_code() {
        assert_eq!(
            decode_all(&[0, 224]),
            vec![
                Key::Extended(SCAN_UNRECOGNIZED),
                Key::Extended(SCAN_UNRECOGNIZED)
            ]
        );
    }

    #[test]
    fn end_of_input_is_an_error() {
        let err = decode(&mut Scripted::new(&[])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn decoded_keys_classify() {
        let mut console = ScriptedConsole {
            console: SystemConsole::new(),
            src: Scripted::new(b"\x1b[A\x1b[C\r\n\x1b[3~zq\x1b"),
        };
        let events: Vec<InputEvent> = (0..8).map(|_| read_event_from(&mut console)).collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Up,
                InputEvent::Right,
                InputEvent::Enter,
                InputEvent::Enter,
                InputEvent::None,
                InputEvent::None,
                InputEvent::Exit,
                InputEvent::Exit,
            ]
        );
    }
}

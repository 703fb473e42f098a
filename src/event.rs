// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

//! Classification of raw console key codes.

/// Raw code announcing that the next read yields a scan code.
pub const SENTINEL_NUL: u8 = 0;
/// Raw code announcing that the next read yields a scan code.
pub const SENTINEL_EXTENDED: u8 = 224;

pub const KEY_ESCAPE: u8 = 27;
pub const KEY_QUIT: u8 = b'q';
pub const KEY_ENTER: u8 = 13;

pub const SCAN_UP: u8 = 72;
pub const SCAN_DOWN: u8 = 80;
pub const SCAN_LEFT: u8 = 75;
pub const SCAN_RIGHT: u8 = 77;

/// The outcome of reading one keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Exit,
    /// Any key the adapter does not recognize.
    None,
}

/// Result of looking at the first raw code of a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Done(InputEvent),
    /// An extended-key sentinel was seen. The scan code follows.
    ReadScanCode,
}

/// Classify the first raw code of a keypress.
pub fn classify(code: u8) -> Step {
    match code {
        SENTINEL_NUL | SENTINEL_EXTENDED => Step::ReadScanCode,
        KEY_ESCAPE | KEY_QUIT => Step::Done(InputEvent::Exit),
        KEY_ENTER => Step::Done(InputEvent::Enter),
        _ => Step::Done(InputEvent::None),
    }
}

/// Classify the scan code read after an extended-key sentinel.
pub fn classify_extended(scan: u8) -> InputEvent {
    match scan {
        SCAN_UP => InputEvent::Up,
        SCAN_DOWN => InputEvent::Down,
        SCAN_LEFT => InputEvent::Left,
        SCAN_RIGHT => InputEvent::Right,
        _ => InputEvent::None,
    }
}

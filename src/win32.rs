// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

#![allow(non_snake_case, dead_code)]
#![allow(clippy::upper_case_acronyms)]

use std::os::windows::raw::HANDLE;

pub type BOOL = i32;

pub const FALSE: BOOL = 0i32;
pub const TRUE: BOOL = 1i32;
pub const INVALID_HANDLE_VALUE: HANDLE = !0 as HANDLE;
pub const STD_ERROR_HANDLE: u32 = 0xfffffff4;
pub const STD_INPUT_HANDLE: u32 = 0xfffffff6;
pub const STD_OUTPUT_HANDLE: u32 = 0xfffffff5;
pub const FILE_TYPE_CHAR: u32 = 2u32;

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct COORD {
    pub X: i16,
    pub Y: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct SMALL_RECT {
    pub Left: i16,
    pub Top: i16,
    pub Right: i16,
    pub Bottom: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct CONSOLE_SCREEN_BUFFER_INFO {
    pub dwSize: COORD,
    pub dwCursorPosition: COORD,
    pub wAttributes: u16,
    pub srWindow: SMALL_RECT,
    pub dwMaximumWindowSize: COORD,
}

windows_link::link!("kernel32.dll" "system" fn GetFileType(hfile: HANDLE) -> u32);
windows_link::link!("kernel32.dll" "system" fn GetStdHandle(nstdhandle: u32) -> HANDLE);
windows_link::link!("kernel32.dll" "system" fn GetConsoleScreenBufferInfo(
    hconsoleoutput: HANDLE,
    lpconsolescreenbufferinfo: *mut CONSOLE_SCREEN_BUFFER_INFO,
) -> BOOL);

// Provided by the C runtime, not kernel32.
extern "C" {
    pub fn _getch() -> i32;
}

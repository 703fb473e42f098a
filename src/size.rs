// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

/// Console buffer extent, rows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalSize {
    pub rows: u16,
    pub columns: u16,
}

impl TerminalSize {
    pub fn new(rows: u16, columns: u16) -> TerminalSize {
        TerminalSize { rows, columns }
    }

    /// The size as a `(rows, columns)` pair.
    pub fn as_pair(&self) -> (u16, u16) {
        (self.rows, self.columns)
    }

    /// Build a size from signed dimensions as reported by the OS.
    /// Returns None if either one is negative.
    #[cfg(any(target_family = "windows", test))]
    pub(crate) fn from_signed(rows: i16, columns: i16) -> Option<TerminalSize> {
        let rows = u16::try_from(rows).ok()?;
        let columns = u16::try_from(columns).ok()?;
        Some(TerminalSize { rows, columns })
    }
}

impl From<TerminalSize> for (u16, u16) {
    fn from(size: TerminalSize) -> (u16, u16) {
        size.as_pair()
    }
}

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::fmt::Display;

/// A stack column of the yard, addressed by row and bay.
///
/// All slots of a column share the same `(row, bay)` pair and differ
/// only in tier; containers within a column obey gravity (no gaps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column {
    row: usize,
    bay: usize,
}

impl Column {
    #[inline]
    pub const fn new(row: usize, bay: usize) -> Self {
        Column { row, bay }
    }

    #[inline]
    pub const fn row(self) -> usize {
        self.row
    }

    #[inline]
    pub const fn bay(self) -> usize {
        self.bay
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({}, {})", self.row, self.bay)
    }
}

/// A single slot of the yard grid: a column plus a tier.
///
/// Tier `0` is the floor. The "workstation" (out of yard) has no slot;
/// callers model it as `Option<SlotPosition>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotPosition {
    row: usize,
    bay: usize,
    tier: usize,
}

impl SlotPosition {
    #[inline]
    pub const fn new(row: usize, bay: usize, tier: usize) -> Self {
        SlotPosition { row, bay, tier }
    }

    #[inline]
    pub const fn row(self) -> usize {
        self.row
    }

    #[inline]
    pub const fn bay(self) -> usize {
        self.bay
    }

    #[inline]
    pub const fn tier(self) -> usize {
        self.tier
    }

    #[inline]
    pub const fn column(self) -> Column {
        Column::new(self.row, self.bay)
    }

    #[inline]
    pub const fn above(self) -> SlotPosition {
        SlotPosition::new(self.row, self.bay, self.tier + 1)
    }
}

impl Display for SlotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({};{};{})", self.row, self.bay, self.tier)
    }
}

impl From<(usize, usize, usize)> for SlotPosition {
    #[inline]
    fn from((row, bay, tier): (usize, usize, usize)) -> Self {
        SlotPosition::new(row, bay, tier)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Layout of one Jacobian row.
//
// For every descriptor component of a local atom, the Jacobian stores 12 numbers: the
// derivative of that component with respect to four 3D coordinate blocks, stacked in the
// order center atom, axis neighbor 0, axis neighbor 1, generic neighbor.

/// Spatial components per coordinate block.
pub const BLOCK_WIDTH: usize = 3;

/// Jacobian entries per descriptor component.
pub const ROW_WIDTH: usize = 4 * BLOCK_WIDTH;

/// Which coordinate block of a Jacobian row a contribution is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordBlock {
    Center,
    Axis0,
    Axis1,
    Generic,
}

/// The four derivative blocks of one descriptor component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBlocks<T> {
    pub center: [T; BLOCK_WIDTH],
    pub axis_0: [T; BLOCK_WIDTH],
    pub axis_1: [T; BLOCK_WIDTH],
    pub generic: [T; BLOCK_WIDTH],
}

impl<T: Copy> CoordinateBlocks<T> {
    /// Reads the blocks from a `ROW_WIDTH`-long slice.
    pub fn from_row(row: &[T]) -> Self {
        debug_assert_eq!(row.len(), ROW_WIDTH);
        Self {
            center: [row[0], row[1], row[2]],
            axis_0: [row[3], row[4], row[5]],
            axis_1: [row[6], row[7], row[8]],
            generic: [row[9], row[10], row[11]],
        }
    }

    pub fn block(&self, which: CoordBlock) -> &[T; BLOCK_WIDTH] {
        match which {
            CoordBlock::Center => &self.center,
            CoordBlock::Axis0 => &self.axis_0,
            CoordBlock::Axis1 => &self.axis_1,
            CoordBlock::Generic => &self.generic,
        }
    }
}

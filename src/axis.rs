// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Axis neighbor resolution and neighbor slot roles.
//
// Each local atom's axis record is four integers: (axis-0 selection, axis-0 slot,
// axis-1 selection, axis-1 slot). Slot ids are relative to their selection; radial slots are
// shifted by n_a_sel into the unified 0..nnei numbering of the neighbor list.
//
// The two axis slots read the full descriptor row. Every other slot only reads the components
// its own neighbor generated: four per angular slot, one per radial slot.

use crate::config::ANGULAR_COMPONENTS;
use crate::jacobian::CoordBlock;
use std::ops::Range;

/// Width of one axis record.
pub const AXIS_RECORD_WIDTH: usize = 4;

/// Neighbor selection an axis slot id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Angular,
    Radial,
}

impl Selection {
    /// Type code 1 is the radial selection; any other code is treated as angular.
    pub fn from_code(code: i32) -> Self {
        if code == 1 {
            Selection::Radial
        } else {
            Selection::Angular
        }
    }
}

/// The two neighbor slots of a local atom that define its local frame.
///
/// `None` marks an axis whose slot id cannot match any neighbor slot (negative after the
/// selection shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSlots {
    pub axis_0: Option<usize>,
    pub axis_1: Option<usize>,
}

impl AxisSlots {
    /// Resolves one axis record into absolute neighbor slots.
    pub fn resolve(record: &[i32], n_a_sel: usize) -> Self {
        debug_assert_eq!(record.len(), AXIS_RECORD_WIDTH);
        Self {
            axis_0: absolute_slot(Selection::from_code(record[0]), record[1], n_a_sel),
            axis_1: absolute_slot(Selection::from_code(record[2]), record[3], n_a_sel),
        }
    }

    /// Role of neighbor slot `slot`. When both axes name the same slot, axis 0 wins.
    pub fn role_of(&self, slot: usize) -> SlotRole {
        if self.axis_0 == Some(slot) {
            SlotRole::Axis0
        } else if self.axis_1 == Some(slot) {
            SlotRole::Axis1
        } else {
            SlotRole::Generic
        }
    }
}

fn absolute_slot(selection: Selection, slot: i32, n_a_sel: usize) -> Option<usize> {
    let shift = match selection {
        Selection::Angular => 0,
        Selection::Radial => n_a_sel as i64,
    };
    usize::try_from(slot as i64 + shift).ok()
}

/// How a neighbor slot takes part in the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Axis0,
    Axis1,
    Generic,
}

impl SlotRole {
    /// The Jacobian block this role reads.
    pub fn block(self) -> CoordBlock {
        match self {
            SlotRole::Axis0 => CoordBlock::Axis0,
            SlotRole::Axis1 => CoordBlock::Axis1,
            SlotRole::Generic => CoordBlock::Generic,
        }
    }

    /// Descriptor components summed for neighbor slot `slot` in this role.
    pub fn descriptor_range(self, slot: usize, n_a_sel: usize, ndescrpt: usize) -> Range<usize> {
        match self {
            SlotRole::Axis0 | SlotRole::Axis1 => 0..ndescrpt,
            SlotRole::Generic => generic_range(slot, n_a_sel),
        }
    }
}

/// Descriptor components generated by neighbor slot `slot` alone.
pub fn generic_range(slot: usize, n_a_sel: usize) -> Range<usize> {
    if slot < n_a_sel {
        let start = slot * ANGULAR_COMPONENTS;
        start..start + ANGULAR_COMPONENTS
    } else {
        let start = n_a_sel * ANGULAR_COMPONENTS + (slot - n_a_sel);
        start..start + 1
    }
}

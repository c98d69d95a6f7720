// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Neighbor-list entries and ghost-to-local folding.
//
// A neighbor list entry is an index into the extended (local + ghost) atom set, or a negative
// value for an empty slot. Ghost atoms are periodic images of local atoms, so indices past the
// local block are folded back with `index % nloc`.

use serde::{Deserialize, Serialize};

/// Where a ghost index stops being left alone and starts being folded onto a local atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldBoundary {
    /// Fold only indices strictly greater than `nloc`. An index equal to `nloc` keeps
    /// addressing the first ghost slot. Matches the existing training pipeline.
    #[default]
    Legacy,
    /// Fold every index `>= nloc`, so all reaction forces land on local atoms.
    Strict,
}

impl FoldBoundary {
    /// Folds a raw neighbor-list entry for a frame with `nloc` local atoms.
    ///
    /// `nloc` must be non-zero whenever `raw` can reach the fold branch.
    pub fn fold(self, raw: i32, nloc: usize) -> NeighborSlot {
        let NeighborSlot::Atom(j) = NeighborSlot::from_raw(raw) else {
            return NeighborSlot::Absent;
        };
        let folds = match self {
            FoldBoundary::Legacy => j > nloc,
            FoldBoundary::Strict => j >= nloc,
        };
        NeighborSlot::Atom(if folds { j % nloc } else { j })
    }

    /// Exclusive upper bound a folded index must respect for a frame of `nloc` local and
    /// `nall` total atoms.
    pub fn limit(self, nloc: usize, nall: usize) -> usize {
        match self {
            FoldBoundary::Legacy => nall,
            FoldBoundary::Strict => nloc,
        }
    }
}

/// One entry of a neighbor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborSlot {
    /// Padding: the slot holds no neighbor and contributes nothing.
    Absent,
    /// Index of the neighbor in the extended atom set.
    Atom(usize),
}

impl NeighborSlot {
    /// Negative entries are padding.
    pub fn from_raw(raw: i32) -> Self {
        match usize::try_from(raw) {
            Ok(j) => NeighborSlot::Atom(j),
            Err(_) => NeighborSlot::Absent,
        }
    }
}

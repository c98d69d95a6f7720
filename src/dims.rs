// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Dimension resolution and input validation.
//
// Problem sizes are not passed in; they are derived from the tensor shapes and the atom-count
// array, then cross-checked against each other and the kernel configuration. Every check here
// runs before the output is allocated.

use crate::axis::AXIS_RECORD_WIDTH;
use crate::config::ProdForceConfig;
use crate::engine::ProdForceInputs;
use crate::error::ProdForceError;
use crate::jacobian::{BLOCK_WIDTH, ROW_WIDTH};
use crate::neighbor::{FoldBoundary, NeighborSlot};
use crate::tensor::Tensor;

/// Per-call problem sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDims {
    /// Number of independent frames.
    pub nframes: usize,
    /// Local atoms per frame.
    pub nloc: usize,
    /// Local plus ghost atoms per frame.
    pub nall: usize,
    /// Descriptor components per local atom.
    pub ndescrpt: usize,
    /// Neighbor slots per local atom.
    pub nnei: usize,
}

fn require(condition: bool, message: impl FnOnce() -> String) -> Result<(), ProdForceError> {
    if condition {
        Ok(())
    } else {
        Err(ProdForceError::invalid(message()))
    }
}

/// Product of `factors`, or `None` if it does not fit in `usize`.
fn checked_product(factors: &[usize]) -> Option<usize> {
    factors.iter().try_fold(1usize, |acc, &f| acc.checked_mul(f))
}

impl FrameDims {
    /// Derives the problem sizes from the inputs and checks that all of them agree.
    pub fn resolve<T>(
        inputs: &ProdForceInputs<'_, T>,
        config: &ProdForceConfig,
    ) -> Result<Self, ProdForceError> {
        let net_deriv = inputs.net_deriv;
        let in_deriv = inputs.in_deriv;
        let nlist = inputs.nlist;
        let axis = inputs.axis;
        let natoms = inputs.natoms;

        require(net_deriv.rank() == 2, || "Dim of net deriv should be 2".into())?;
        require(in_deriv.rank() == 2, || "Dim of input deriv should be 2".into())?;
        require(nlist.rank() == 2, || "Dim of nlist should be 2".into())?;
        require(axis.rank() == 2, || "Dim of axis should be 2".into())?;
        require(natoms.rank() == 1, || "Dim of natoms should be 1".into())?;
        require(natoms.dim_size(0) >= 3, || {
            format!(
                "number of atoms should be larger than (or equal to) 3, got {} entries",
                natoms.dim_size(0)
            )
        })?;

        let counts = natoms.as_slice();
        let nloc = usize::try_from(counts[0])
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ProdForceError::invalid(format!(
                    "number of local atoms should be positive, got {}",
                    counts[0]
                ))
            })?;
        let nall = usize::try_from(counts[1])
            .ok()
            .filter(|&n| n >= nloc)
            .ok_or_else(|| {
                ProdForceError::invalid(format!(
                    "number of all atoms ({}) should not be smaller than number of local atoms ({})",
                    counts[1], nloc
                ))
            })?;

        let nframes = net_deriv.dim_size(0);
        require(net_deriv.dim_size(1) % nloc == 0, || {
            format!(
                "width of net deriv ({}) should be a multiple of the number of local atoms ({})",
                net_deriv.dim_size(1),
                nloc
            )
        })?;
        require(nlist.dim_size(1) % nloc == 0, || {
            format!(
                "width of nlist ({}) should be a multiple of the number of local atoms ({})",
                nlist.dim_size(1),
                nloc
            )
        })?;
        let ndescrpt = net_deriv.dim_size(1) / nloc;
        let nnei = nlist.dim_size(1) / nloc;

        for (name, tensor_frames) in [
            ("input deriv", in_deriv.dim_size(0)),
            ("nlist", nlist.dim_size(0)),
            ("axis", axis.dim_size(0)),
        ] {
            require(tensor_frames == nframes, || {
                format!(
                    "number of samples should match: {} has {} frames, net deriv has {}",
                    name, tensor_frames, nframes
                )
            })?;
        }

        let in_deriv_width = checked_product(&[nloc, ndescrpt, ROW_WIDTH]);
        require(in_deriv_width == Some(in_deriv.dim_size(1)), || {
            format!(
                "number of descriptors should match: input deriv width is {}, expected {} x {} x {}{}",
                in_deriv.dim_size(1),
                nloc,
                ndescrpt,
                ROW_WIDTH,
                if in_deriv_width.is_none() { " (overflows usize)" } else { "" }
            )
        })?;
        require(nnei == config.nnei(), || {
            format!(
                "number of neighbors should match: nlist has {} per atom, n_a_sel + n_r_sel = {}",
                nnei,
                config.nnei()
            )
        })?;
        let axis_width = checked_product(&[nloc, AXIS_RECORD_WIDTH]);
        require(axis_width == Some(axis.dim_size(1)), || {
            format!(
                "number of axis type+id should match 2+2: axis width is {}, expected {} x {}{}",
                axis.dim_size(1),
                nloc,
                AXIS_RECORD_WIDTH,
                if axis_width.is_none() { " (overflows usize)" } else { "" }
            )
        })?;
        require(ndescrpt >= config.min_descriptor_width(), || {
            format!(
                "descriptor width ({}) should cover 4 x n_a_sel + n_r_sel = {}",
                ndescrpt,
                config.min_descriptor_width()
            )
        })?;

        require(checked_product(&[nframes, nall, BLOCK_WIDTH]).is_some(), || {
            format!(
                "force tensor of {} frames x {} atoms x {} overflows usize",
                nframes, nall, BLOCK_WIDTH
            )
        })?;

        Ok(Self {
            nframes,
            nloc,
            nall,
            ndescrpt,
            nnei,
        })
    }

    // The width helpers below cannot overflow for dims returned by `resolve`: each product was
    // either checked there or equals a declared tensor width.

    /// Force entries per frame.
    pub fn force_width(&self) -> usize {
        BLOCK_WIDTH * self.nall
    }

    /// Descriptor gradient entries per frame.
    pub fn net_deriv_width(&self) -> usize {
        self.nloc * self.ndescrpt
    }

    /// Jacobian entries per frame.
    pub fn in_deriv_width(&self) -> usize {
        self.nloc * self.ndescrpt * ROW_WIDTH
    }

    /// Neighbor list entries per frame.
    pub fn nlist_width(&self) -> usize {
        self.nloc * self.nnei
    }

    /// Axis record entries per frame.
    pub fn axis_width(&self) -> usize {
        self.nloc * AXIS_RECORD_WIDTH
    }
}

/// Rejects neighbor indices that, after folding, address a force slot the fold policy does not
/// allow (`[0, nall)` for legacy folding, `[0, nloc)` for strict folding).
pub fn check_neighbor_indices(
    nlist: &Tensor<i32>,
    dims: &FrameDims,
    fold: FoldBoundary,
) -> Result<(), ProdForceError> {
    if dims.nnei == 0 {
        return Ok(());
    }
    let limit = fold.limit(dims.nloc, dims.nall);
    for (frame, entries) in nlist.as_slice().chunks(dims.nlist_width()).enumerate() {
        for (k, &raw) in entries.iter().enumerate() {
            if let NeighborSlot::Atom(folded) = fold.fold(raw, dims.nloc) {
                if folded >= limit {
                    return Err(ProdForceError::NeighborOutOfRange {
                        frame,
                        atom: k / dims.nnei,
                        slot: k % dims.nnei,
                        index: raw,
                        folded,
                        limit,
                    });
                }
            }
        }
    }
    Ok(())
}

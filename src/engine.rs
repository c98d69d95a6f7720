// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Force accumulation.
//
// Reverse-mode chain rule from descriptor gradients to Cartesian forces:
//
//   F[i]  -= sum_a  dE/dD[i,a] * dD[i,a]/dR_center
//   F[j]  -= sum_a  dE/dD[i,a] * dD[i,a]/dR_block      for every neighbor slot of i
//
// where the block is axis-0, axis-1 or generic depending on the slot's role, and generic slots
// only sum the components their own neighbor generated.
//
// Frames run in parallel, one worker per frame. Inside a frame several atoms write reaction
// forces into the same neighbor slots, so the frame itself is accumulated sequentially.

use crate::axis::{AxisSlots, AXIS_RECORD_WIDTH};
use crate::config::ProdForceConfig;
use crate::dims::{check_neighbor_indices, FrameDims};
use crate::error::ProdForceError;
use crate::jacobian::{CoordBlock, CoordinateBlocks, BLOCK_WIDTH, ROW_WIDTH};
use crate::neighbor::NeighborSlot;
use crate::precision::Real;
use crate::tensor::Tensor;
use log::{debug, trace};
use rayon::prelude::*;
use std::ops::Range;

/// The tensors of one force evaluation, all frame-major.
pub struct ProdForceInputs<'a, T> {
    /// `[nframes, nloc * ndescrpt]`: gradient of the objective w.r.t. the descriptors.
    pub net_deriv: &'a Tensor<T>,
    /// `[nframes, nloc * ndescrpt * 12]`: descriptor derivatives w.r.t. coordinates.
    pub in_deriv: &'a Tensor<T>,
    /// `[nframes, nloc * nnei]`: neighbor indices, negative for empty slots.
    pub nlist: &'a Tensor<i32>,
    /// `[nframes, nloc * 4]`: axis records.
    pub axis: &'a Tensor<i32>,
    /// `[>= 3]`: `nloc`, `nall`, then entries this kernel ignores.
    pub natoms: &'a Tensor<i32>,
}

/// One frame's worth of input rows.
pub struct FrameInputs<'a, T> {
    pub net_deriv: &'a [T],
    pub in_deriv: &'a [T],
    pub nlist: &'a [i32],
    pub axis: &'a [i32],
}

impl<'a, T> ProdForceInputs<'a, T> {
    /// Slices out frame `index`. `dims` must come from resolving these inputs.
    pub fn frame(&self, dims: &FrameDims, index: usize) -> FrameInputs<'a, T> {
        debug_assert_eq!(self.net_deriv.dim_size(1), dims.net_deriv_width());
        debug_assert_eq!(self.nlist.dim_size(1), dims.nlist_width());
        FrameInputs {
            net_deriv: self.net_deriv.row(index),
            in_deriv: self.in_deriv.row(index),
            nlist: self.nlist.row(index),
            axis: self.axis.row(index),
        }
    }
}

/// Trait for force kernels.
///
/// A force kernel turns descriptor gradients and descriptor Jacobians into Cartesian forces on
/// every local and ghost atom of every frame.
pub trait ForceKernel<T: Real> {
    /// Computes the `[nframes, 3 * nall]` force tensor.
    ///
    /// Fails before touching any output if the inputs are inconsistent.
    fn compute_forces(&self, inputs: &ProdForceInputs<'_, T>) -> Result<Tensor<T>, ProdForceError>;
}

/// Force kernel for descriptors built in a local frame defined by two axis neighbors.
pub struct ProdForce {
    config: ProdForceConfig,
    pool: rayon::ThreadPool,
}

impl ProdForce {
    /// Builds the kernel and its worker pool of `config.num_threads` threads.
    pub fn new(config: ProdForceConfig) -> Result<Self, ProdForceError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("prod-force-{i}"))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ProdForceConfig {
        &self.config
    }
}

impl<T: Real> ForceKernel<T> for ProdForce {
    fn compute_forces(&self, inputs: &ProdForceInputs<'_, T>) -> Result<Tensor<T>, ProdForceError> {
        let dims = FrameDims::resolve(inputs, &self.config)?;
        check_neighbor_indices(inputs.nlist, &dims, self.config.fold_boundary)?;
        debug!(
            "prod_force: nframes={} nloc={} nall={} ndescrpt={} nnei={}, {} of {} worker(s) busy",
            dims.nframes,
            dims.nloc,
            dims.nall,
            dims.ndescrpt,
            dims.nnei,
            self.config.num_threads.min(dims.nframes),
            self.config.num_threads
        );

        let force_width = dims.force_width();
        let mut force = vec![T::zero(); dims.nframes * force_width];
        let config = &self.config;
        self.pool.install(|| {
            force
                .par_chunks_mut(force_width)
                .enumerate()
                .for_each(|(kk, frame_force)| {
                    trace!("prod_force: accumulating frame {kk}");
                    accumulate_frame(&dims, config, &inputs.frame(&dims, kk), frame_force);
                });
        });

        Tensor::from_vec(&[dims.nframes, force_width], force)
    }
}

/// Accumulates the forces of one frame into `force` (`3 * nall` entries).
///
/// The whole buffer is zeroed first, ghost slots included.
///
/// # Panics
///
/// Panics if the slices do not match `dims` or a folded neighbor index falls outside `force`;
/// [`FrameDims::resolve`] and [`check_neighbor_indices`] rule both out.
pub fn accumulate_frame<T: Real>(
    dims: &FrameDims,
    config: &ProdForceConfig,
    frame: &FrameInputs<'_, T>,
    force: &mut [T],
) {
    let nloc = dims.nloc;
    let ndescrpt = dims.ndescrpt;
    let nnei = dims.nnei;
    let jacobian_width = ndescrpt * ROW_WIDTH;

    force.fill(T::zero());

    for ii in 0..nloc {
        let grad = &frame.net_deriv[ii * ndescrpt..(ii + 1) * ndescrpt];
        let jacobian = &frame.in_deriv[ii * jacobian_width..(ii + 1) * jacobian_width];

        subtract_block(
            atom_force(force, ii),
            grad,
            jacobian,
            0..ndescrpt,
            CoordBlock::Center,
        );

        let axes = AxisSlots::resolve(
            &frame.axis[ii * AXIS_RECORD_WIDTH..(ii + 1) * AXIS_RECORD_WIDTH],
            config.n_a_sel,
        );
        let neighbors = &frame.nlist[ii * nnei..(ii + 1) * nnei];
        for (jj, &raw) in neighbors.iter().enumerate() {
            let NeighborSlot::Atom(j) = config.fold_boundary.fold(raw, nloc) else {
                continue;
            };
            let role = axes.role_of(jj);
            subtract_block(
                atom_force(force, j),
                grad,
                jacobian,
                role.descriptor_range(jj, config.n_a_sel, ndescrpt),
                role.block(),
            );
        }
    }
}

fn atom_force<T>(force: &mut [T], atom: usize) -> &mut [T] {
    &mut force[atom * BLOCK_WIDTH..(atom + 1) * BLOCK_WIDTH]
}

/// `target -= sum_{a in components} grad[a] * jacobian[a, block]`
fn subtract_block<T: Real>(
    target: &mut [T],
    grad: &[T],
    jacobian: &[T],
    components: Range<usize>,
    block: CoordBlock,
) {
    for a in components {
        let blocks = CoordinateBlocks::from_row(&jacobian[a * ROW_WIDTH..(a + 1) * ROW_WIDTH]);
        for (f, &d) in target.iter_mut().zip(blocks.block(block)) {
            *f -= grad[a] * d;
        }
    }
}

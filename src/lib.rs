// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # descriptor-force
//!
//! Per-atom forces for descriptor-based machine-learned interatomic potentials.
//!
//! A neural network supplies the gradient of the energy with respect to every local atom's
//! descriptor; the descriptor builder supplies the Jacobian of each descriptor component with
//! respect to four coordinate blocks (the atom itself, its two axis neighbors and an ordinary
//! neighbor). This crate contracts the two into Cartesian forces, including the reaction forces
//! on every neighbor, for a batch of independent frames.
//!
//! ```no_run
//! use descriptor_force::{ForceKernel, ProdForce, ProdForceConfig, ProdForceInputs, Tensor};
//!
//! # fn main() -> Result<(), descriptor_force::ProdForceError> {
//! # let (net_deriv, in_deriv, nlist, axis, natoms): (Tensor<f64>, Tensor<f64>, Tensor<i32>, Tensor<i32>, Tensor<i32>) = unimplemented!();
//! let kernel = ProdForce::new(ProdForceConfig::new(16, 32).with_num_threads(4))?;
//! let force = kernel.compute_forces(&ProdForceInputs {
//!     net_deriv: &net_deriv,
//!     in_deriv: &in_deriv,
//!     nlist: &nlist,
//!     axis: &axis,
//!     natoms: &natoms,
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!   - `dims`: problem sizes derived from the input shapes, and their validation
//!   - `axis`: axis neighbor resolution and the descriptor range each neighbor slot reads
//!   - `engine`: the force accumulation itself
//!   - `neighbor`: empty slots and ghost-to-local folding

pub mod axis;
pub mod config;
pub mod dims;
pub mod engine;
pub mod error;
pub mod jacobian;
pub mod neighbor;
pub mod precision;
pub mod tensor;

pub use config::ProdForceConfig;
pub use dims::FrameDims;
pub use engine::{accumulate_frame, ForceKernel, FrameInputs, ProdForce, ProdForceInputs};
pub use error::ProdForceError;
pub use neighbor::FoldBoundary;
pub use precision::Real;
pub use tensor::Tensor;

// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use thiserror::Error;

/// Everything that can make a force evaluation refuse to run.
///
/// All variants are raised before any accumulation starts, so a failed call never hands back a
/// partially written force tensor.
#[derive(Debug, Error)]
pub enum ProdForceError {
    /// A shape or consistency constraint between the inputs does not hold. The message names
    /// the violated constraint.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A neighbor index that, once folded, would address a force slot outside the frame.
    #[error(
        "Neighbor index {index} of frame {frame}, atom {atom}, slot {slot} folds to {folded}, \
         outside of [0, {limit})"
    )]
    NeighborOutOfRange {
        frame: usize,
        atom: usize,
        slot: usize,
        index: i32,
        folded: usize,
        limit: usize,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProdForceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::error::ProdForceError;
use crate::neighbor::FoldBoundary;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of descriptor components an angular neighbor contributes.
pub const ANGULAR_COMPONENTS: usize = 4;

/// Construction-time configuration of the force kernel.
///
/// Can be written inline or loaded from TOML:
///
/// ```toml
/// n_a_sel = 16
/// n_r_sel = 32
/// num_threads = 4
/// fold_boundary = "legacy"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdForceConfig {
    /// Size of the angular neighbor selection.
    pub n_a_sel: usize,
    /// Size of the radial-only neighbor selection.
    pub n_r_sel: usize,
    /// Number of worker threads frames are spread over. Default: 1.
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    /// Ghost index folding policy. Default: [`FoldBoundary::Legacy`].
    #[serde(default)]
    pub fold_boundary: FoldBoundary,
}

fn default_num_threads() -> usize {
    1
}

impl ProdForceConfig {
    pub fn new(n_a_sel: usize, n_r_sel: usize) -> Self {
        Self {
            n_a_sel,
            n_r_sel,
            num_threads: default_num_threads(),
            fold_boundary: FoldBoundary::default(),
        }
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_fold_boundary(mut self, fold_boundary: FoldBoundary) -> Self {
        self.fold_boundary = fold_boundary;
        self
    }

    /// Neighbor slots per local atom.
    pub fn nnei(&self) -> usize {
        self.n_a_sel.saturating_add(self.n_r_sel)
    }

    /// Descriptor components occupied by the angular selection; radial components start here.
    pub fn angular_shift(&self) -> usize {
        self.n_a_sel.saturating_mul(ANGULAR_COMPONENTS)
    }

    /// Smallest descriptor width whose rows hold every neighbor slot's generic range.
    pub fn min_descriptor_width(&self) -> usize {
        self.angular_shift().saturating_add(self.n_r_sel)
    }

    pub fn validate(&self) -> Result<(), ProdForceError> {
        if self.num_threads == 0 {
            return Err(ProdForceError::Config(
                "num_threads should be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ProdForceError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProdForceError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

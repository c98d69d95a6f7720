// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use num_traits::Float;
use std::fmt::Debug;
use std::ops::SubAssign;

/// Element type shared by the descriptor gradient, the coordinate Jacobian and the force output.
///
/// Implemented for `f32` and `f64`; the caller picks the precision by the tensors it passes in.
pub trait Real: Float + SubAssign + Debug + Send + Sync + 'static {}

impl<T> Real for T where T: Float + SubAssign + Debug + Send + Sync + 'static {}

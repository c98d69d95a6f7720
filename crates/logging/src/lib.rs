// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # descriptor-force Logging
//!
//! This crate initializes the logging framework for processes that drive the force kernel.  The
//! kernel itself only talks to the [`log`] facade; this crate wires that facade to [`env_logger`]
//! on desktop platforms, so that the resolved problem sizes and per-frame traces emitted by the
//! kernel end up on the terminal.
//!
//! By default, the logging level is set to [`Info`](log::Level::Info) for debug builds, and
//! [`Warn`](log::Level::Warn) for release builds. This can be overridden by setting the `RUST_LOG`
//! environment variable, like so:
//!
//! ```sh
//! $> RUST_LOG=descriptor_force=trace cargo test
//! ```

mod platform;
mod platform_impl;
pub use platform::Logger;

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::Logger;
}

// End of File

// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

/// Initializes the logging framework to capture logs from the crates specified with a minimum
/// [`log::Level`] of [`Info`](log::Level::Info) on debug builds and [`Warn`](log::Level::Warn) on
/// release builds.  On desktop platforms, these defaults can be overridden by setting the
/// `RUST_LOG` environment variable.
pub struct Logger {
    crates: Vec<&'static str>,
    level: log::LevelFilter,
}

impl Logger {
    /// Creates a new [`Logger`] capturing logs from the specified list of crates, at the default
    /// level for the build profile.
    pub fn new(crates: Vec<&'static str>) -> Self {
        Self {
            crates,
            level: if cfg!(debug_assertions) {
                log::LevelFilter::Info
            } else {
                log::LevelFilter::Warn
            },
        }
    }

    /// Overrides the default level used when `RUST_LOG` is not set.
    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// The filter directive handed to the logger when `RUST_LOG` is not set, e.g.
    /// `descriptor_force=info`.
    pub fn filter_directive(&self) -> String {
        crate::platform_impl::filter_directive(&self.crates, self.level)
    }

    /// Installs the global logger.  Returns `false` if a logger was already installed, which
    /// happens routinely when several tests in one binary each ask for logging.
    pub fn init(&self) -> bool {
        crate::platform_impl::init_with_level(&self.crates, self.level)
    }
}


// End of File

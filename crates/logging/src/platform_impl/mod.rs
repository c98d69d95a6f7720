// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Desktop platforms log through env_logger.  Everything else gets the default implementation,
// which only records the requested level with the `log` facade and installs no sink.

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
mod desktop;
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
pub(crate) use self::desktop::*;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod default;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub(crate) use self::default::*;

/// Build the filter string that would have been set in RUST_LOG.
pub(crate) fn filter_directive(crates: &[&'static str], log_level: log::LevelFilter) -> String {
    let level_str = match log_level {
        log::LevelFilter::Off => "off",
        log::LevelFilter::Error => "error",
        log::LevelFilter::Warn => "warn",
        log::LevelFilter::Info => "info",
        log::LevelFilter::Debug => "debug",
        log::LevelFilter::Trace => "trace",
    };
    crates
        .iter()
        .map(|&pkg_name| format!("{}={}", pkg_name.replace('-', "_"), level_str))
        .collect::<Vec<_>>()
        .join(",")
}

// End of File

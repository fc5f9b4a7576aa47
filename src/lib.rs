// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Hardware backends and polling for dock-panel applets.
//!
//! The crate covers the backend subsystem shared by a CPU frequency applet
//! and a sensors applet: discovery binds one backend strategy per hardware
//! unit (sysfs cpufreq first, /proc/cpuinfo as read-only fallback, plus
//! four thermal sensor families), and a poller turns periodic best-effort
//! reads into display-ready snapshots. Host integration (icon rendering,
//! tooltips, the session bus object) lives outside this crate.

pub mod cli;
pub mod common;
pub mod device;
pub mod error;
pub mod metrics;

pub use device::registry::{discover_cpus, discover_sensors, DiscoveryPaths};
pub use device::{CpuBackend, HardwareUnit};
pub use error::{Error, Result};
pub use metrics::{Poller, Snapshot};

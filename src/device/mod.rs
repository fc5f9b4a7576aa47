// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

pub mod common;
pub mod cpu_procinfo;
pub mod cpu_sysfs;
pub mod registry;
pub mod sensors;

use serde::Serialize;

use crate::{Error, Result};

/// One monitorable (and possibly controllable) piece of hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HardwareUnit {
    Cpu(u32),
    Sensor(String),
}

impl std::fmt::Display for HardwareUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareUnit::Cpu(nr) => write!(f, "cpu{nr}"),
            HardwareUnit::Sensor(id) => write!(f, "{id}"),
        }
    }
}

/// Per-CPU backend strategy. Bound to one CPU index for its lifetime.
///
/// All value reads are best-effort: a transient I/O failure yields 0, never
/// an error, so one flaky core can never take down a poll tick. The default
/// method bodies implement the read-only (non-scaling) contract; a
/// scaling-capable backend overrides the governor/frequency operations.
pub trait CpuBackend: Send {
    fn cpu_nr(&self) -> u32;

    fn unit(&self) -> HardwareUnit {
        HardwareUnit::Cpu(self.cpu_nr())
    }

    /// Whether this backend can change the unit's frequency/governor.
    fn supports_scaling(&self) -> bool {
        false
    }

    /// Current frequency in kHz; 0 on any read failure.
    fn current_frequency(&self) -> u64;

    /// Frequencies (kHz) this unit can be set to. For non-scaling backends
    /// this is just the current frequency.
    fn frequencies(&self) -> Vec<u64>;

    fn governors(&self) -> Vec<String> {
        Vec::new()
    }

    fn current_governor(&self) -> Option<String> {
        None
    }

    /// Hardware frequency bounds in kHz (the immutable `cpuinfo_*` values,
    /// not the OS-adjustable scaling bounds). 0 when unknown.
    fn phys_min_frequency(&self) -> u64 {
        0
    }

    fn phys_max_frequency(&self) -> u64 {
        0
    }

    /// OS-adjustable scaling bounds in kHz. 0 when unknown.
    fn scaling_min_frequency(&self) -> u64 {
        0
    }

    fn scaling_max_frequency(&self) -> u64 {
        0
    }

    /// Change the scaling governor via the privileged helper.
    ///
    /// Fails with [`Error::InvalidGovernor`] when the name is not in
    /// `governors()`. Dispatch is fire-and-forget: success of the OS-level
    /// change is only observable by re-polling.
    fn set_governor(&self, governor: &str) -> Result<()> {
        let _ = governor;
        Err(Error::ScalingUnsupported(self.cpu_nr()))
    }

    /// Pin the unit to a frequency (kHz) via the privileged helper.
    ///
    /// Fails with [`Error::InvalidFrequency`] when the value is not in
    /// `frequencies()`; otherwise fire-and-forget like `set_governor`.
    fn set_frequency(&self, khz: u64) -> Result<()> {
        let _ = khz;
        Err(Error::ScalingUnsupported(self.cpu_nr()))
    }
}

impl std::fmt::Debug for dyn CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CpuBackend({})", self.unit())
    }
}

// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! One-time startup discovery: binds a backend to every CPU index and
//! aggregates the sensor families into one deterministic list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::common::config::SysPaths;
use crate::device::common::{CommandLauncher, DetachedLauncher};
use crate::device::cpu_procinfo::ProcCpuInfoBackend;
use crate::device::cpu_sysfs::SysFsCpuBackend;
use crate::device::sensors::{
    probe_coretemp, probe_hwmon, probe_thermal_zones, probe_vendor_tools, SensorSource,
};
use crate::device::CpuBackend;
use crate::{Error, Result};

/// Filesystem exposure roots used by discovery. Overridable so tests can
/// point the registry at a fixture tree.
#[derive(Debug, Clone)]
pub struct DiscoveryPaths {
    pub cpu_sysfs_root: PathBuf,
    pub proc_cpuinfo: PathBuf,
    pub hwmon_root: PathBuf,
    pub thermal_root: PathBuf,
    pub platform_root: PathBuf,
    /// Vendor tool probing execs real binaries; off in tests.
    pub probe_vendor_tools: bool,
}

impl Default for DiscoveryPaths {
    fn default() -> Self {
        Self {
            cpu_sysfs_root: PathBuf::from(SysPaths::CPU_SYSFS_ROOT),
            proc_cpuinfo: PathBuf::from(SysPaths::PROC_CPUINFO),
            hwmon_root: PathBuf::from(SysPaths::VIRTUAL_HWMON_ROOT),
            thermal_root: PathBuf::from(SysPaths::VIRTUAL_THERMAL_ROOT),
            platform_root: PathBuf::from(SysPaths::PLATFORM_ROOT),
            probe_vendor_tools: true,
        }
    }
}

impl DiscoveryPaths {
    /// All sysfs/proc roots relocated under one fixture directory, vendor
    /// tools disabled.
    pub fn under_root(root: &Path) -> Self {
        Self {
            cpu_sysfs_root: root.join("sys/devices/system/cpu"),
            proc_cpuinfo: root.join("proc/cpuinfo"),
            hwmon_root: root.join("sys/devices/virtual/hwmon"),
            thermal_root: root.join("sys/devices/virtual/thermal"),
            platform_root: root.join("sys/devices/platform"),
            probe_vendor_tools: false,
        }
    }
}

/// Bind one backend per CPU index, first usable variant wins.
///
/// The variant order is fixed: the sysfs cpufreq backend (scaling-capable),
/// then the /proc/cpuinfo fallback. An index with no usable variant aborts
/// discovery with [`Error::NoUsableBackend`]; running with nothing to poll
/// would be meaningless.
pub fn discover_cpus() -> Result<Vec<Box<dyn CpuBackend>>> {
    discover_cpus_at(&DiscoveryPaths::default(), Arc::new(DetachedLauncher))
}

pub fn discover_cpus_at(
    paths: &DiscoveryPaths,
    launcher: Arc<dyn CommandLauncher>,
) -> Result<Vec<Box<dyn CpuBackend>>> {
    let mut count = SysFsCpuBackend::cpu_count_at(&paths.cpu_sysfs_root);
    if count == 0 {
        count = ProcCpuInfoBackend::cpu_count_at(&paths.proc_cpuinfo);
        debug!("no sysfs CPU tree, counted {count} cpuinfo records");
    }

    let mut backends: Vec<Box<dyn CpuBackend>> = Vec::with_capacity(count as usize);
    for cpu_nr in 0..count {
        if SysFsCpuBackend::usable_at(&paths.cpu_sysfs_root, cpu_nr) {
            backends.push(Box::new(SysFsCpuBackend::with_root(
                &paths.cpu_sysfs_root,
                cpu_nr,
                launcher.clone(),
            )));
        } else if ProcCpuInfoBackend::usable_at(&paths.proc_cpuinfo, cpu_nr) {
            backends.push(Box::new(ProcCpuInfoBackend::with_path(
                &paths.proc_cpuinfo,
                cpu_nr,
            )));
        } else {
            return Err(Error::NoUsableBackend(cpu_nr));
        }
    }

    info!("bound {} CPU backend(s)", backends.len());
    Ok(backends)
}

/// Probe every sensor family in fixed order and merge the survivors,
/// sorted by source id (then display name) for a stable display order.
pub fn discover_sensors() -> Vec<SensorSource> {
    discover_sensors_at(&DiscoveryPaths::default())
}

pub fn discover_sensors_at(paths: &DiscoveryPaths) -> Vec<SensorSource> {
    let mut sensors = Vec::new();
    sensors.extend(probe_hwmon(&paths.hwmon_root));
    sensors.extend(probe_thermal_zones(&paths.thermal_root));
    sensors.extend(probe_coretemp(&paths.platform_root));
    if paths.probe_vendor_tools {
        sensors.extend(probe_vendor_tools());
    }

    sensors.sort_by(|a, b| (&a.id, &a.display_name).cmp(&(&b.id, &b.display_name)));
    info!("discovered {} sensor source(s)", sensors.len());
    sensors
}

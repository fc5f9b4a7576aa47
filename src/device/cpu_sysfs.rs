// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Scaling-capable CPU backend over the sysfs cpufreq tree.
//!
//! Reads everything from `<root>/cpu<N>/cpufreq/` and delegates privileged
//! writes to the setuid `cpufreq-set` helper as a detached command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::common::config::{AppConfig, SysPaths};
use crate::device::common::parsers::{read_first_line, read_tokens, read_u64_or_zero};
use crate::device::common::{CommandLauncher, CommandSpec, DetachedLauncher};
use crate::device::CpuBackend;
use crate::{Error, Result};

static CPU_DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^cpu\d+$").unwrap());

pub struct SysFsCpuBackend {
    cpu_nr: u32,
    root: PathBuf,
    // cpuinfo_{min,max}_freq are hardware-immutable; read once here and
    // never re-read on the poll path.
    phys_min: u64,
    phys_max: u64,
    launcher: Arc<dyn CommandLauncher>,
}

impl SysFsCpuBackend {
    pub fn new(cpu_nr: u32) -> Self {
        Self::with_root(
            Path::new(SysPaths::CPU_SYSFS_ROOT),
            cpu_nr,
            Arc::new(DetachedLauncher),
        )
    }

    pub fn with_root(root: &Path, cpu_nr: u32, launcher: Arc<dyn CommandLauncher>) -> Self {
        let cpufreq = root.join(format!("cpu{cpu_nr}")).join("cpufreq");
        let phys_min = read_u64_or_zero(&cpufreq.join("cpuinfo_min_freq"));
        let phys_max = read_u64_or_zero(&cpufreq.join("cpuinfo_max_freq"));
        Self {
            cpu_nr,
            root: root.to_path_buf(),
            phys_min,
            phys_max,
            launcher,
        }
    }

    /// Pure probe: is the cpufreq control directory present for this CPU?
    pub fn usable(cpu_nr: u32) -> bool {
        Self::usable_at(Path::new(SysPaths::CPU_SYSFS_ROOT), cpu_nr)
    }

    pub fn usable_at(root: &Path, cpu_nr: u32) -> bool {
        root.join(format!("cpu{cpu_nr}")).join("cpufreq").is_dir()
    }

    /// Count `cpu<N>` entries under the sysfs CPU tree. 0 when the tree is
    /// absent (the registry then falls back to counting cpuinfo records).
    pub fn cpu_count() -> u32 {
        Self::cpu_count_at(Path::new(SysPaths::CPU_SYSFS_ROOT))
    }

    pub fn cpu_count_at(root: &Path) -> u32 {
        let Ok(entries) = std::fs::read_dir(root) else {
            return 0;
        };
        entries
            .filter_map(|e| e.ok())
            .filter(|e| CPU_DIR_RE.is_match(&e.file_name().to_string_lossy()))
            .count() as u32
    }

    fn cpufreq_path(&self, file: &str) -> PathBuf {
        self.root
            .join(format!("cpu{}", self.cpu_nr))
            .join("cpufreq")
            .join(file)
    }

    fn read_freq_file(&self, file: &str) -> u64 {
        read_u64_or_zero(&self.cpufreq_path(file))
    }

    fn dispatch(&self, spec: CommandSpec) {
        // Fire-and-forget: a failed spawn is an environment flake, not a
        // caller error. The unchanged value on the next tick is the only
        // signal.
        if let Err(e) = self.launcher.launch_detached(&spec) {
            warn!("failed to launch '{spec}': {e}");
        }
    }
}

impl CpuBackend for SysFsCpuBackend {
    fn cpu_nr(&self) -> u32 {
        self.cpu_nr
    }

    fn supports_scaling(&self) -> bool {
        true
    }

    fn current_frequency(&self) -> u64 {
        self.read_freq_file("scaling_cur_freq")
    }

    fn frequencies(&self) -> Vec<u64> {
        read_tokens(&self.cpufreq_path("scaling_available_frequencies"))
            .unwrap_or_default()
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect()
    }

    fn governors(&self) -> Vec<String> {
        read_tokens(&self.cpufreq_path("scaling_available_governors")).unwrap_or_default()
    }

    fn current_governor(&self) -> Option<String> {
        read_first_line(&self.cpufreq_path("scaling_governor")).ok()
    }

    fn phys_min_frequency(&self) -> u64 {
        self.phys_min
    }

    fn phys_max_frequency(&self) -> u64 {
        self.phys_max
    }

    fn scaling_min_frequency(&self) -> u64 {
        self.read_freq_file("scaling_min_freq")
    }

    fn scaling_max_frequency(&self) -> u64 {
        self.read_freq_file("scaling_max_freq")
    }

    fn set_governor(&self, governor: &str) -> Result<()> {
        if !self.governors().iter().any(|g| g == governor) {
            return Err(Error::InvalidGovernor(governor.to_string()));
        }
        self.dispatch(CommandSpec::new(
            AppConfig::FREQ_SET_BINARY,
            ["-c".to_string(), self.cpu_nr.to_string(), "-g".to_string(), governor.to_string()],
        ));
        Ok(())
    }

    fn set_frequency(&self, khz: u64) -> Result<()> {
        if !self.frequencies().contains(&khz) {
            return Err(Error::InvalidFrequency(khz));
        }
        self.dispatch(CommandSpec::new(
            AppConfig::FREQ_SET_BINARY,
            ["-c".to_string(), self.cpu_nr.to_string(), "-f".to_string(), khz.to_string()],
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records specs instead of spawning anything.
    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<CommandSpec>>,
    }

    impl CommandLauncher for RecordingLauncher {
        fn launch_detached(&self, spec: &CommandSpec) -> std::io::Result<()> {
            self.launched.lock().unwrap().push(spec.clone());
            Ok(())
        }
    }

    fn fake_cpufreq_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let cpufreq = dir.path().join("cpu0").join("cpufreq");
        fs::create_dir_all(&cpufreq).unwrap();
        fs::write(cpufreq.join("cpuinfo_min_freq"), "800000\n").unwrap();
        fs::write(cpufreq.join("cpuinfo_max_freq"), "3200000\n").unwrap();
        fs::write(cpufreq.join("scaling_min_freq"), "800000\n").unwrap();
        fs::write(cpufreq.join("scaling_max_freq"), "2500000\n").unwrap();
        fs::write(cpufreq.join("scaling_cur_freq"), "2000000\n").unwrap();
        fs::write(cpufreq.join("scaling_governor"), "ondemand\n").unwrap();
        fs::write(
            cpufreq.join("scaling_available_governors"),
            "conservative ondemand userspace powersave performance\n",
        )
        .unwrap();
        fs::write(
            cpufreq.join("scaling_available_frequencies"),
            "3200000 2500000 2000000 1600000 800000\n",
        )
        .unwrap();
        dir
    }

    fn backend(dir: &TempDir) -> (SysFsCpuBackend, Arc<RecordingLauncher>) {
        let launcher = Arc::new(RecordingLauncher::default());
        let backend = SysFsCpuBackend::with_root(dir.path(), 0, launcher.clone());
        (backend, launcher)
    }

    #[test]
    fn test_usable_probe() {
        let dir = fake_cpufreq_tree();
        assert!(SysFsCpuBackend::usable_at(dir.path(), 0));
        assert!(!SysFsCpuBackend::usable_at(dir.path(), 1));

        let empty = TempDir::new().unwrap();
        assert!(!SysFsCpuBackend::usable_at(empty.path(), 0));
    }

    #[test]
    fn test_cpu_count() {
        let dir = fake_cpufreq_tree();
        fs::create_dir_all(dir.path().join("cpu1")).unwrap();
        fs::create_dir_all(dir.path().join("cpufreq")).unwrap(); // not a cpu dir
        fs::create_dir_all(dir.path().join("cpuidle")).unwrap(); // not a cpu dir
        assert_eq!(SysFsCpuBackend::cpu_count_at(dir.path()), 2);

        assert_eq!(
            SysFsCpuBackend::cpu_count_at(Path::new("/nonexistent/cpu/root")),
            0
        );
    }

    #[test]
    fn test_reads() {
        let dir = fake_cpufreq_tree();
        let (backend, _) = backend(&dir);

        assert!(backend.supports_scaling());
        assert_eq!(backend.current_frequency(), 2_000_000);
        assert_eq!(backend.phys_min_frequency(), 800_000);
        assert_eq!(backend.phys_max_frequency(), 3_200_000);
        assert_eq!(backend.scaling_min_frequency(), 800_000);
        assert_eq!(backend.scaling_max_frequency(), 2_500_000);
        assert_eq!(backend.current_governor().as_deref(), Some("ondemand"));
        assert_eq!(
            backend.frequencies(),
            vec![3_200_000, 2_500_000, 2_000_000, 1_600_000, 800_000]
        );
        assert_eq!(backend.governors().len(), 5);
    }

    #[test]
    fn test_phys_bounds_cached_at_construction() {
        let dir = fake_cpufreq_tree();
        let (backend, _) = backend(&dir);

        fs::write(
            dir.path().join("cpu0/cpufreq/cpuinfo_max_freq"),
            "9999999\n",
        )
        .unwrap();
        assert_eq!(backend.phys_max_frequency(), 3_200_000);
    }

    #[test]
    fn test_read_failure_yields_zero() {
        let dir = fake_cpufreq_tree();
        let (backend, _) = backend(&dir);

        fs::remove_file(dir.path().join("cpu0/cpufreq/scaling_cur_freq")).unwrap();
        assert_eq!(backend.current_frequency(), 0);
    }

    #[test]
    fn test_set_governor_valid() {
        let dir = fake_cpufreq_tree();
        let (backend, launcher) = backend(&dir);

        backend.set_governor("performance").unwrap();

        let launched = launcher.launched.lock().unwrap();
        assert_eq!(launched.len(), 1);
        assert_eq!(
            launched[0],
            CommandSpec::new("cpufreq-set", ["-c", "0", "-g", "performance"])
        );
    }

    #[test]
    fn test_set_governor_invalid() {
        let dir = fake_cpufreq_tree();
        let (backend, launcher) = backend(&dir);

        let err = backend.set_governor("warpspeed").unwrap_err();
        assert!(matches!(err, Error::InvalidGovernor(_)));
        assert!(launcher.launched.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_frequency_valid() {
        let dir = fake_cpufreq_tree();
        let (backend, launcher) = backend(&dir);

        backend.set_frequency(1_600_000).unwrap();

        let launched = launcher.launched.lock().unwrap();
        assert_eq!(launched.len(), 1);
        assert_eq!(
            launched[0],
            CommandSpec::new("cpufreq-set", ["-c", "0", "-f", "1600000"])
        );
    }

    #[test]
    fn test_set_frequency_invalid() {
        let dir = fake_cpufreq_tree();
        let (backend, launcher) = backend(&dir);

        let err = backend.set_frequency(1_234_567).unwrap_err();
        assert!(matches!(err, Error::InvalidFrequency(1_234_567)));
        assert!(launcher.launched.lock().unwrap().is_empty());
    }
}

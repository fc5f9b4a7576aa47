// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Read-only CPU backend over the legacy /proc/cpuinfo table.
//!
//! Fallback for kernels without the cpufreq sysfs tree. No scaling: the
//! backend only reports the `cpu MHz` field of its record, converted to
//! kHz.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::common::config::SysPaths;
use crate::device::CpuBackend;

static CPU_MHZ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"cpu MHz\s*:\s*(\d+(?:\.\d+)?)").unwrap());

pub struct ProcCpuInfoBackend {
    cpu_nr: u32,
    cpuinfo_path: PathBuf,
}

impl ProcCpuInfoBackend {
    pub fn new(cpu_nr: u32) -> Self {
        Self::with_path(Path::new(SysPaths::PROC_CPUINFO), cpu_nr)
    }

    pub fn with_path(cpuinfo_path: &Path, cpu_nr: u32) -> Self {
        Self {
            cpu_nr,
            cpuinfo_path: cpuinfo_path.to_path_buf(),
        }
    }

    /// Pure probe: does the table exist and list this processor index?
    pub fn usable(cpu_nr: u32) -> bool {
        Self::usable_at(Path::new(SysPaths::PROC_CPUINFO), cpu_nr)
    }

    pub fn usable_at(cpuinfo_path: &Path, cpu_nr: u32) -> bool {
        match fs::read_to_string(cpuinfo_path) {
            Ok(content) => Self::lists_processor(&content, cpu_nr),
            Err(_) => false,
        }
    }

    pub fn cpu_count() -> u32 {
        Self::cpu_count_at(Path::new(SysPaths::PROC_CPUINFO))
    }

    pub fn cpu_count_at(cpuinfo_path: &Path) -> u32 {
        match fs::read_to_string(cpuinfo_path) {
            Ok(content) => Self::count_records(&content),
            Err(_) => 0,
        }
    }

    fn lists_processor(content: &str, cpu_nr: u32) -> bool {
        let re = Regex::new(&format!(r"processor\s*:\s*{cpu_nr}\b")).unwrap();
        re.is_match(content)
    }

    fn count_records(content: &str) -> u32 {
        CPU_MHZ_RE.find_iter(content).count() as u32
    }

    /// The `cpu MHz` value of the nth record, truncated to whole MHz and
    /// converted to kHz. 0 when the record is missing or unparseable.
    fn frequency_khz_in(content: &str, cpu_nr: u32) -> u64 {
        let Some(cap) = CPU_MHZ_RE.captures_iter(content).nth(cpu_nr as usize) else {
            return 0;
        };
        match cap[1].parse::<f64>() {
            Ok(mhz) => mhz.trunc() as u64 * 1000,
            Err(e) => {
                debug!("unparseable cpu MHz field for cpu{cpu_nr}: {e}");
                0
            }
        }
    }
}

impl CpuBackend for ProcCpuInfoBackend {
    fn cpu_nr(&self) -> u32 {
        self.cpu_nr
    }

    fn current_frequency(&self) -> u64 {
        match fs::read_to_string(&self.cpuinfo_path) {
            Ok(content) => Self::frequency_khz_in(&content, self.cpu_nr),
            Err(e) => {
                debug!("unreadable {}: {e}", self.cpuinfo_path.display());
                0
            }
        }
    }

    fn frequencies(&self) -> Vec<u64> {
        vec![self.current_frequency()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz
cpu MHz\t\t: 3700.000
cache size\t: 12288 KB
physical id\t: 0

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz
cpu MHz\t\t: 1896.254
cache size\t: 12288 KB
physical id\t: 0
";

    fn fixture() -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(CPUINFO.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_lists_processor() {
        assert!(ProcCpuInfoBackend::lists_processor(CPUINFO, 0));
        assert!(ProcCpuInfoBackend::lists_processor(CPUINFO, 1));
        assert!(!ProcCpuInfoBackend::lists_processor(CPUINFO, 2));
        // "processor : 1" must not satisfy a probe for cpu 11
        assert!(!ProcCpuInfoBackend::lists_processor(CPUINFO, 11));
    }

    #[test]
    fn test_count_records() {
        assert_eq!(ProcCpuInfoBackend::count_records(CPUINFO), 2);
        assert_eq!(ProcCpuInfoBackend::count_records(""), 0);
    }

    #[test]
    fn test_frequency_khz() {
        assert_eq!(ProcCpuInfoBackend::frequency_khz_in(CPUINFO, 0), 3_700_000);
        // truncated to whole MHz before the kHz conversion
        assert_eq!(ProcCpuInfoBackend::frequency_khz_in(CPUINFO, 1), 1_896_000);
        assert_eq!(ProcCpuInfoBackend::frequency_khz_in(CPUINFO, 2), 0);
    }

    #[test]
    fn test_usable_at_missing_file() {
        assert!(!ProcCpuInfoBackend::usable_at(
            Path::new("/nonexistent/cpuinfo"),
            0
        ));
    }

    #[test]
    fn test_backend_reads() {
        let f = fixture();
        let backend = ProcCpuInfoBackend::with_path(f.path(), 1);

        assert_eq!(backend.cpu_nr(), 1);
        assert!(!backend.supports_scaling());
        assert_eq!(backend.current_frequency(), 1_896_000);
        assert_eq!(backend.frequencies(), vec![1_896_000]);
        assert!(backend.governors().is_empty());
        assert!(backend.current_governor().is_none());
    }

    #[test]
    fn test_writes_rejected() {
        let f = fixture();
        let backend = ProcCpuInfoBackend::with_path(f.path(), 0);

        assert!(matches!(
            backend.set_governor("performance"),
            Err(Error::ScalingUnsupported(0))
        ));
        assert!(matches!(
            backend.set_frequency(1_000_000),
            Err(Error::ScalingUnsupported(0))
        ));
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let backend = ProcCpuInfoBackend::with_path(Path::new("/nonexistent/cpuinfo"), 0);
        assert_eq!(backend.current_frequency(), 0);
    }
}

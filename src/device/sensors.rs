// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Thermal sensor sources.
//!
//! Four exposure families are probed at discovery: virtual hwmon nodes,
//! virtual thermal zones, platform coretemp per-core nodes, and vendor
//! report tools (aticonfig, nvidia-temperature, hdd-temperature). Each
//! family fails independently: a missing directory or binary contributes
//! zero sources and never aborts discovery of the rest.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::config::AppConfig;
use crate::device::common::command_executor::capture_first_line;
use crate::device::common::parsers::{
    last_token_f64, pipe_field_f64, read_first_line, read_millidegrees_or_zero,
};

/// How a vendor tool's single report line is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    /// Trailing whitespace-separated token (aticonfig, nvidia-temperature).
    LastToken,
    /// Pipe-delimited field at a fixed index (hddtemp wire format).
    PipeField(usize),
}

enum ValueReader {
    /// A sysfs millidegree input file.
    MilliDegreesFile(std::path::PathBuf),
    /// A subprocess run per read.
    Command {
        program: String,
        args: Vec<String>,
        field: OutputField,
    },
}

/// One discovered thermal source with its display bounds fixed at
/// discovery time.
pub struct SensorSource {
    pub id: String,
    pub display_name: String,
    pub min_bound: f64,
    pub max_bound: f64,
    pub unit: String,
    reader: ValueReader,
}

impl SensorSource {
    /// Best-effort read. Any I/O, parse or exec failure yields 0.0 so a
    /// single dead sensor cannot suppress the rest of a poll tick.
    pub fn current_value(&self) -> f64 {
        match &self.reader {
            ValueReader::MilliDegreesFile(path) => read_millidegrees_or_zero(path),
            ValueReader::Command {
                program,
                args,
                field,
            } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                match capture_first_line(program, &args) {
                    Ok(line) => parse_report_line(&line, *field).unwrap_or_else(|| {
                        debug!("unparseable output from '{program}': {line:?}");
                        0.0
                    }),
                    Err(e) => {
                        debug!("failed to run '{program}': {e}");
                        0.0
                    }
                }
            }
        }
    }
}

fn parse_report_line(line: &str, field: OutputField) -> Option<f64> {
    let value = match field {
        OutputField::LastToken => last_token_f64(line)?,
        OutputField::PipeField(index) => pipe_field_f64(line, index)?,
    };
    Some(value.trunc())
}

/// Build one sysfs thermal source from a `<dir>/{name,input,max}` triple.
/// None when any of the discovery-time files is unreadable; the caller
/// skips the entry and carries on with the family.
fn sysfs_thermal_source(
    dir: &Path,
    id: &str,
    name_file: &str,
    input_file: &str,
    max_file: &str,
) -> Option<SensorSource> {
    let display_name = read_first_line(&dir.join(name_file)).ok()?;
    let crit_milli = read_first_line(&dir.join(max_file))
        .ok()?
        .parse::<f64>()
        .ok()?;
    let max_bound = (crit_milli * AppConfig::SENSOR_CRIT_FRACTION / 1000.0).trunc();

    Some(SensorSource {
        id: id.to_string(),
        display_name,
        min_bound: AppConfig::SENSOR_MIN_BOUND_C,
        max_bound,
        unit: "°C".to_string(),
        reader: ValueReader::MilliDegreesFile(dir.join(input_file)),
    })
}

fn subdirs_with_prefix(root: &Path, prefix: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        debug!("sensor family root {} not present", root.display());
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(prefix))
        .collect();
    names.sort();
    names
}

/// Virtual hwmon nodes: `<root>/hwmon*/{name,temp1_input,temp1_crit}`.
pub fn probe_hwmon(root: &Path) -> Vec<SensorSource> {
    subdirs_with_prefix(root, "hwmon")
        .iter()
        .filter_map(|name| {
            sysfs_thermal_source(&root.join(name), name, "name", "temp1_input", "temp1_crit")
        })
        .collect()
}

/// Virtual thermal zones: `<root>/thermal_zone*/{type,temp,trip_point_0_temp}`.
pub fn probe_thermal_zones(root: &Path) -> Vec<SensorSource> {
    subdirs_with_prefix(root, "thermal_zone")
        .iter()
        .filter_map(|name| {
            sysfs_thermal_source(&root.join(name), name, "type", "temp", "trip_point_0_temp")
        })
        .collect()
}

/// Platform coretemp nodes: `<root>/coretemp.*` exposing one
/// `tempN_{label,input,max}` triple per core.
pub fn probe_coretemp(platform_root: &Path) -> Vec<SensorSource> {
    let mut sources = Vec::new();
    for device in subdirs_with_prefix(platform_root, "coretemp.") {
        let dir = platform_root.join(&device);
        let mut prefixes: Vec<String> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.starts_with("temp") && n.ends_with("_label"))
                .map(|n| n.trim_end_matches("_label").to_string())
                .collect(),
            Err(e) => {
                debug!("unreadable coretemp device {}: {e}", dir.display());
                continue;
            }
        };
        prefixes.sort();

        for prefix in prefixes {
            if let Some(source) = sysfs_thermal_source(
                &dir,
                &device,
                &format!("{prefix}_label"),
                &format!("{prefix}_input"),
                &format!("{prefix}_max"),
            ) {
                sources.push(source);
            }
        }
    }
    sources
}

struct VendorTool {
    id: &'static str,
    program: &'static str,
    args: &'static [&'static str],
    field: OutputField,
    min_bound: f64,
    max_bound: f64,
}

const VENDOR_TOOLS: &[VendorTool] = &[
    VendorTool {
        id: "fglrx",
        program: "aticonfig",
        args: &["--pplib-cmd", "get temperature 0"],
        field: OutputField::LastToken,
        min_bound: 50.0,
        max_bound: 90.0,
    },
    VendorTool {
        id: "nvidia",
        program: "nvidia-temperature",
        args: &[],
        field: OutputField::LastToken,
        min_bound: 50.0,
        max_bound: 90.0,
    },
    VendorTool {
        id: "hdd",
        program: "hdd-temperature",
        args: &[],
        field: OutputField::PipeField(3),
        min_bound: 40.0,
        max_bound: 60.0,
    },
];

/// Vendor report tools. The discovery probe runs each tool once; any exec
/// or parse failure drops that tool from the sensor set.
pub fn probe_vendor_tools() -> Vec<SensorSource> {
    VENDOR_TOOLS
        .iter()
        .filter_map(|tool| {
            let line = match capture_first_line(tool.program, tool.args) {
                Ok(line) => line,
                Err(e) => {
                    debug!("vendor tool '{}' unavailable: {e}", tool.program);
                    return None;
                }
            };
            parse_report_line(&line, tool.field)?;

            Some(SensorSource {
                id: tool.id.to_string(),
                display_name: tool.id.to_string(),
                min_bound: tool.min_bound,
                max_bound: tool.max_bound,
                unit: "°C".to_string(),
                reader: ValueReader::Command {
                    program: tool.program.to_string(),
                    args: tool.args.iter().map(|a| a.to_string()).collect(),
                    field: tool.field,
                },
            })
        })
        .collect()
}

// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Per-tick read pass over the bound backends.
//!
//! A tick performs one synchronous read of every backend and produces a
//! fresh snapshot; the renderer swaps whole snapshots, so a partially
//! updated view is never exposed. Readings are discarded after rendering,
//! nothing is retained between ticks.

use chrono::Local;
use serde::Serialize;

use crate::common::config::AppConfig;
use crate::device::sensors::SensorSource;
use crate::device::CpuBackend;
use crate::metrics::bucket::{cpu_bucket, sensor_bucket};
use crate::metrics::format::human_readable_frequency;

#[derive(Debug, Clone, Serialize)]
pub struct CpuReading {
    pub cpu: u32,
    pub frequency_khz: u64,
    pub governor: Option<String>,
    pub scaling: bool,
    /// Icon state index in 0..14.
    pub bucket: usize,
    /// Tooltip row, e.g. `CPU 0: ondemand, 2.50 GHz`.
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub bucket: usize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time: String,
    pub cpus: Vec<CpuReading>,
    pub sensors: Vec<SensorReading>,
}

pub struct Poller {
    cpus: Vec<Box<dyn CpuBackend>>,
    sensors: Vec<SensorSource>,
}

impl Poller {
    pub fn new(cpus: Vec<Box<dyn CpuBackend>>, sensors: Vec<SensorSource>) -> Self {
        Self { cpus, sensors }
    }

    pub fn cpu_count(&self) -> usize {
        self.cpus.len()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn poll_cpus(&self) -> Vec<CpuReading> {
        self.cpus.iter().map(|backend| read_cpu(backend.as_ref())).collect()
    }

    pub fn poll_sensors(&self) -> Vec<SensorReading> {
        self.sensors.iter().map(read_sensor).collect()
    }

    /// One full read pass, timestamped.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            cpus: self.poll_cpus(),
            sensors: self.poll_sensors(),
        }
    }
}

fn read_cpu(backend: &dyn CpuBackend) -> CpuReading {
    let frequency_khz = backend.current_frequency();
    let scaling = backend.supports_scaling();

    // Non-scaling backends have no meaningful physical range; they always
    // show the hottest icon state.
    let bucket = if scaling {
        cpu_bucket(
            frequency_khz,
            backend.phys_min_frequency(),
            backend.phys_max_frequency(),
        )
    } else {
        AppConfig::BUCKET_COUNT - 1
    };

    let governor = backend.current_governor();
    let formatted = human_readable_frequency(frequency_khz);
    let label = match &governor {
        Some(governor) => format!("CPU {}: {governor}, {formatted}", backend.cpu_nr()),
        None => format!("CPU {}: {formatted}", backend.cpu_nr()),
    };

    CpuReading {
        cpu: backend.cpu_nr(),
        frequency_khz,
        governor,
        scaling,
        bucket,
        label,
    }
}

fn read_sensor(source: &SensorSource) -> SensorReading {
    let value = source.current_value();
    let bucket = sensor_bucket(value, source.min_bound, source.max_bound);
    let label = format!(
        "{} \t {:>4}{}",
        source.display_name,
        value.round() as i64,
        source.unit
    );

    SensorReading {
        id: source.id.clone(),
        name: source.display_name.clone(),
        value,
        unit: source.unit.clone(),
        bucket,
        label,
    }
}

// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

use clap::{Parser, Subcommand};

use crate::common::config::AppConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll CPU frequencies and sensors, printing a snapshot per tick. (default)
    Watch(WatchArgs),
    /// Discover hardware units and print what got bound, then exit.
    List(ListArgs),
    /// Change the governor or pin the frequency of one CPU.
    Set(SetArgs),
}

#[derive(Parser)]
pub struct WatchArgs {
    /// Interval in seconds between CPU frequency reads.
    #[arg(long, default_value_t = AppConfig::CPU_POLL_INTERVAL_SECS)]
    pub cpu_interval: u64,
    /// Interval in seconds between sensor reads.
    #[arg(long, default_value_t = AppConfig::SENSOR_POLL_INTERVAL_SECS)]
    pub sensor_interval: u64,
    /// Print one JSON document per snapshot instead of tooltip text.
    #[arg(long)]
    pub json: bool,
    /// Take a single snapshot and exit.
    #[arg(long)]
    pub once: bool,
    /// Skip sensor discovery and polling.
    #[arg(long)]
    pub no_sensors: bool,
}

impl Default for WatchArgs {
    fn default() -> Self {
        Self {
            cpu_interval: AppConfig::CPU_POLL_INTERVAL_SECS,
            sensor_interval: AppConfig::SENSOR_POLL_INTERVAL_SECS,
            json: false,
            once: false,
            no_sensors: false,
        }
    }
}

#[derive(Parser)]
pub struct ListArgs {
    /// Print the discovered units as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct SetArgs {
    /// CPU index to control.
    #[arg(short, long)]
    pub cpu: u32,
    /// Governor to switch to (e.g. "ondemand", "performance").
    #[arg(short, long, conflicts_with = "frequency")]
    pub governor: Option<String>,
    /// Frequency in kHz to pin the CPU to.
    #[arg(short, long)]
    pub frequency: Option<u64>,
}

// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use dockmon::cli::{Cli, Commands, ListArgs, SetArgs, WatchArgs};
use dockmon::device::registry::{discover_cpus, discover_sensors};
use dockmon::metrics::format::human_readable_frequency;
use dockmon::{Error, Poller, Result};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Watch(args)) => run_watch(args).await,
        Some(Commands::List(args)) => run_list(args),
        Some(Commands::Set(args)) => run_set(args),
        None => run_watch(WatchArgs::default()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("dockmon: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_watch(args: WatchArgs) -> Result<()> {
    let cpus = discover_cpus()?;
    let sensors = if args.no_sensors {
        Vec::new()
    } else {
        discover_sensors()
    };
    let poller = Poller::new(cpus, sensors);

    if args.once {
        print_snapshot(&poller, args.json);
        return Ok(());
    }

    // Ticks drive full read passes; the sensor interval only controls how
    // often the (slower, possibly subprocess-backed) sensor half refreshes.
    let mut cpu_tick = tokio::time::interval(Duration::from_secs(args.cpu_interval.max(1)));
    let mut sensor_tick = tokio::time::interval(Duration::from_secs(args.sensor_interval.max(1)));
    let mut snapshot = poller.snapshot();

    loop {
        tokio::select! {
            _ = cpu_tick.tick() => {
                snapshot.cpus = poller.poll_cpus();
            }
            _ = sensor_tick.tick() => {
                snapshot.sensors = poller.poll_sensors();
            }
            _ = tokio::signal::ctrl_c() => {
                return Ok(());
            }
        }
        snapshot.time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        print_rendered(&snapshot, args.json);
    }
}

fn print_snapshot(poller: &Poller, json: bool) {
    let snapshot = poller.snapshot();
    print_rendered(&snapshot, json);
}

fn print_rendered(snapshot: &dockmon::Snapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(doc) => println!("{doc}"),
            Err(e) => error!("failed to serialize snapshot: {e}"),
        }
        return;
    }

    for cpu in &snapshot.cpus {
        println!("{} [{}]", cpu.label, cpu.bucket);
    }
    for sensor in &snapshot.sensors {
        println!("{} [{}]", sensor.label, sensor.bucket);
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let cpus = discover_cpus()?;
    let sensors = discover_sensors();

    if args.json {
        let poller = Poller::new(cpus, sensors);
        match serde_json::to_string_pretty(&poller.snapshot()) {
            Ok(doc) => println!("{doc}"),
            Err(e) => error!("failed to serialize snapshot: {e}"),
        }
        return Ok(());
    }

    for backend in &cpus {
        let scaling = if backend.supports_scaling() {
            format!(
                "scaling {} - {}",
                human_readable_frequency(backend.phys_min_frequency()),
                human_readable_frequency(backend.phys_max_frequency())
            )
        } else {
            "read-only".to_string()
        };
        println!("{}: {scaling}", backend.unit());
    }
    for sensor in &sensors {
        println!(
            "{}: {} ({} .. {} {})",
            sensor.id, sensor.display_name, sensor.min_bound, sensor.max_bound, sensor.unit
        );
    }
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    let cpus = discover_cpus()?;
    let backend = cpus
        .iter()
        .find(|b| b.cpu_nr() == args.cpu)
        .ok_or(Error::NoUsableBackend(args.cpu))?;

    match (args.governor, args.frequency) {
        (Some(governor), None) => backend.set_governor(&governor),
        (None, Some(khz)) => backend.set_frequency(khz),
        _ => {
            eprintln!("dockmon: set requires exactly one of --governor or --frequency");
            Ok(())
        }
    }
}

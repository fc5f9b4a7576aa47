// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

// Command execution utilities for device modules.
//
// Two flavors exist:
// - Detached: privileged writes (cpufreq-set) are fire-and-forget. The core
//   hands a CommandSpec to a CommandLauncher and never observes completion
//   or exit status; the effect shows up on a later poll tick or not at all.
// - Captured: vendor temperature tools are run synchronously and their
//   first stdout line is parsed.

use std::io;
use std::process::{Command, Stdio};

/// A fully-described external command: program plus arguments, no shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

/// Launches detached commands on behalf of a backend.
///
/// Backends only ever produce a [`CommandSpec`]; the launcher is the seam
/// where tests substitute a recorder for the real spawn.
pub trait CommandLauncher: Send + Sync {
    fn launch_detached(&self, spec: &CommandSpec) -> io::Result<()>;
}

/// The production launcher: spawns the process and drops the child handle
/// without waiting. Stdio is discarded so an orphaned helper cannot block
/// on a closed pipe.
#[derive(Debug, Default)]
pub struct DetachedLauncher;

impl CommandLauncher for DetachedLauncher {
    fn launch_detached(&self, spec: &CommandSpec) -> io::Result<()> {
        Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// Run a command to completion and return the first line of stdout,
/// trimmed. Used by vendor sensor tools whose whole report is one line.
pub fn capture_first_line(program: &str, args: &[&str]) -> io::Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(io::Error::other(format!(
            "'{program}' exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().unwrap_or("").trim().to_string())
}

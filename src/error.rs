// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Unified error types for the dockmon library.
//!
//! Read-path failures are deliberately *not* represented here: a transient
//! unreadable sysfs file or a garbled vendor tool line collapses to a zero
//! reading so a poll tick can never fail. The only caller-visible errors are
//! invalid control requests and a discovery environment with no usable
//! backend at all.

use thiserror::Error;

/// The main error type for dockmon operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A governor name was requested that is not in the unit's
    /// `scaling_available_governors` set.
    #[error("governor '{0}' is not in the available set")]
    InvalidGovernor(String),

    /// A frequency was requested that is not in the unit's
    /// `scaling_available_frequencies` set.
    #[error("frequency {0} kHz is not in the available set")]
    InvalidFrequency(u64),

    /// A control operation was dispatched to a backend that cannot scale.
    ///
    /// Callers are expected to check `supports_scaling()` first; reaching
    /// this error indicates a caller bug, not an environment problem.
    #[error("cpu{0} backend does not support frequency scaling")]
    ScalingUnsupported(u32),

    /// No backend variant was usable for a discovered CPU index.
    ///
    /// This is the one unrecoverable discovery condition: continuing would
    /// leave nothing meaningful to poll, so startup aborts.
    #[error("no usable backend for cpu{0}")]
    NoUsableBackend(u32),

    /// An I/O error occurred outside the fallback-wrapped read paths.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for dockmon operations.
pub type Result<T> = std::result::Result<T, Error>;

// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Mapping of continuous readings onto the 14 discrete icon states.
//!
//! Rounding rule: `f64::round`, i.e. half away from zero. Ties at bucket
//! boundaries round up.

use crate::common::config::AppConfig;

const LAST_BUCKET: usize = AppConfig::BUCKET_COUNT - 1;

/// Map a CPU frequency onto a bucket given the unit's hardware bounds.
///
/// The physical range is split into `BUCKET_COUNT - 1` steps; the current
/// value may transiently sit outside the bounds (the OS does not guarantee
/// them), so the index is clamped. A degenerate range maps to the hottest
/// bucket, same as a non-scaling backend.
pub fn cpu_bucket(current_khz: u64, phys_min_khz: u64, phys_max_khz: u64) -> usize {
    if phys_max_khz <= phys_min_khz {
        return LAST_BUCKET;
    }
    let step = (phys_max_khz - phys_min_khz) as f64 / LAST_BUCKET as f64;
    let index = (current_khz as f64 - phys_min_khz as f64) / step;
    (index.round().max(0.0) as usize).min(LAST_BUCKET)
}

/// Map a sensor value onto a bucket given its display bounds.
///
/// Values below the floor pin to bucket 0; anything past 90% of the range
/// pins to the hottest bucket (guards the near-boundary region as well as
/// overshoot past `max`).
pub fn sensor_bucket(value: f64, min_bound: f64, max_bound: f64) -> usize {
    let fraction = (value - min_bound) / (max_bound - min_bound);
    if !fraction.is_finite() || fraction < 0.0 {
        return 0;
    }
    if fraction > AppConfig::SENSOR_OVERSHOOT_GUARD {
        return LAST_BUCKET;
    }
    ((AppConfig::BUCKET_COUNT as f64 * fraction).round() as usize).min(LAST_BUCKET)
}

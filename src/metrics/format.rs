// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

//! Human-readable frequency labels for tooltips.

/// Format a kHz frequency as MHz below 1 GHz and GHz at or above, with two
/// decimals unless the value divides the unit evenly.
pub fn human_readable_frequency(khz: u64) -> String {
    let khz = khz as f64;
    let (divisor, unit) = if khz >= 1e6 { (1e6, "GHz") } else { (1e3, "MHz") };

    if khz % divisor == 0.0 {
        format!("{} {unit}", (khz / divisor) as u64)
    } else {
        format!("{:.2} {unit}", khz / divisor)
    }
}

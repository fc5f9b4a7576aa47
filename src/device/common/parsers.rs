// Copyright (C) 2026  dockmon contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 2 of the License.

// Fallback-on-error value reads shared by all backends.
//
// Monitoring must never crash on a transient unreadable file: the *_or_zero
// helpers swallow every I/O and parse failure and report a zero reading
// instead. The Option-returning token extractors leave the policy decision
// to the caller (discovery probes drop the source, poll reads zero it).

use std::fs;
use std::path::Path;

use tracing::debug;

/// Read a file and return its first line, trimmed.
pub fn read_first_line(path: &Path) -> std::io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().next().unwrap_or("").trim().to_string())
}

/// Read a whole file trimmed, split on whitespace.
pub fn read_tokens(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.split_whitespace().map(str::to_string).collect())
}

/// Read a single integer value (e.g. a cpufreq kHz file). Zero on any
/// failure.
pub fn read_u64_or_zero(path: &Path) -> u64 {
    match read_first_line(path).map(|line| line.parse::<u64>()) {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            debug!("unparseable integer in {}: {e}", path.display());
            0
        }
        Err(e) => {
            debug!("unreadable {}: {e}", path.display());
            0
        }
    }
}

/// Read a millidegree thermal input file as whole degrees. Zero on any
/// failure.
pub fn read_millidegrees_or_zero(path: &Path) -> f64 {
    match read_first_line(path).map(|line| line.parse::<i64>()) {
        Ok(Ok(milli)) => (milli / 1000) as f64,
        Ok(Err(e)) => {
            debug!("unparseable thermal input {}: {e}", path.display());
            0.0
        }
        Err(e) => {
            debug!("unreadable {}: {e}", path.display());
            0.0
        }
    }
}

/// Parse the last whitespace-separated token of a line as a float
/// (e.g. `Temperature - Sensor 0: 61.00 C` style vendor tool output).
/// Returns None if the line is empty or the token is not numeric.
pub fn last_token_f64(line: &str) -> Option<f64> {
    line.split_whitespace().next_back()?.parse::<f64>().ok()
}

/// Parse field `index` of a pipe-delimited line as a float
/// (hddtemp-style `|/dev/sda|ST9500325AS|40|C|` output, where the leading
/// pipe makes the temperature field 3).
pub fn pipe_field_f64(line: &str, index: usize) -> Option<f64> {
    line.split('|').nth(index)?.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_read_first_line() {
        let f = fixture("ondemand\n");
        assert_eq!(read_first_line(f.path()).unwrap(), "ondemand");

        let f = fixture("performance powersave\nsecond line\n");
        assert_eq!(read_first_line(f.path()).unwrap(), "performance powersave");
    }

    #[test]
    fn test_read_tokens() {
        let f = fixture("2500000 2000000 1600000 800000\n");
        assert_eq!(
            read_tokens(f.path()).unwrap(),
            vec!["2500000", "2000000", "1600000", "800000"]
        );
    }

    #[test]
    fn test_read_u64_or_zero() {
        let f = fixture("1600000\n");
        assert_eq!(read_u64_or_zero(f.path()), 1_600_000);

        let f = fixture("garbage\n");
        assert_eq!(read_u64_or_zero(f.path()), 0);

        assert_eq!(read_u64_or_zero(Path::new("/nonexistent/scaling_cur_freq")), 0);
    }

    #[test]
    fn test_read_millidegrees_or_zero() {
        let f = fixture("61500\n");
        assert_eq!(read_millidegrees_or_zero(f.path()), 61.0);

        assert_eq!(read_millidegrees_or_zero(Path::new("/nonexistent/temp")), 0.0);
    }

    #[test]
    fn test_last_token_f64() {
        assert_eq!(last_token_f64("Temperature - Sensor 0: 61.00"), Some(61.0));
        assert_eq!(last_token_f64("55"), Some(55.0));
        assert_eq!(last_token_f64(""), None);
        assert_eq!(last_token_f64("no numbers here"), None);
    }

    #[test]
    fn test_pipe_field_f64() {
        assert_eq!(pipe_field_f64("|/dev/sda|ST9500325AS|40|C|", 3), Some(40.0));
        assert_eq!(pipe_field_f64("|/dev/sda|ST9500325AS|40|C|", 4), None);
        assert_eq!(pipe_field_f64("too|short", 5), None);
    }
}

/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Display bucketing
    //
    // Continuous readings are mapped to one of 14 discrete icon states,
    // matching the cpufreq-0.svg .. cpufreq-13.svg image set shipped with
    // the applets.
    pub const BUCKET_COUNT: usize = 14;

    // Poll cadence
    pub const CPU_POLL_INTERVAL_SECS: u64 = 1;
    pub const SENSOR_POLL_INTERVAL_SECS: u64 = 5;

    // Sensor bound heuristics
    //
    // Sysfs thermal families report a critical trip point; the displayed
    // ceiling is 80% of it. Sources with no usable threshold get a fixed
    // floor of 40 degrees.
    pub const SENSOR_MIN_BOUND_C: f64 = 40.0;
    pub const SENSOR_CRIT_FRACTION: f64 = 0.8;

    // Range fraction above which a sensor reading snaps to the hottest
    // bucket regardless of the computed index.
    pub const SENSOR_OVERSHOOT_GUARD: f64 = 0.9;

    // Privileged helper used for governor/frequency writes. Expected to be
    // setuid (the applets never gain privileges themselves).
    pub const FREQ_SET_BINARY: &'static str = "cpufreq-set";
}

/// Default filesystem exposure roots. Overridable for tests via
/// `DiscoveryPaths`.
pub struct SysPaths;

impl SysPaths {
    pub const CPU_SYSFS_ROOT: &'static str = "/sys/devices/system/cpu";
    pub const PROC_CPUINFO: &'static str = "/proc/cpuinfo";
    pub const VIRTUAL_HWMON_ROOT: &'static str = "/sys/devices/virtual/hwmon";
    pub const VIRTUAL_THERMAL_ROOT: &'static str = "/sys/devices/virtual/thermal";
    pub const PLATFORM_ROOT: &'static str = "/sys/devices/platform";
}

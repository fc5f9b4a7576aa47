pub mod bucket;
pub mod format;
pub mod poller;

pub use poller::{CpuReading, Poller, SensorReading, Snapshot};

/// Default onset decision value, sized for 16-bit ADC trigger pulses
pub const DEFAULT_THRESHOLD: f64 = 20000.0;

/// Marker written by jstim ahead of every stimulus it queues
pub const DEFAULT_LOG_MARKER: &str = "next stim: ";

/// Zero-based whitespace token holding the stimulus name on a marker line
pub const DEFAULT_STIM_TOKEN: usize = 4;

/// Bark datatype code for interval event data
pub const EVENT_DATATYPE: u32 = 2001;

/// Bark stores dataset metadata next to the data with this suffix
pub const META_SUFFIX: &str = ".meta.yaml";

pub const NAME_COLUMN: &str = "name";
pub const START_COLUMN: &str = "start";
pub const STOP_COLUMN: &str = "stop";

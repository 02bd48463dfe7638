/// Record layout
pub const DELIMITER: u8 = b';';
pub const LINE_TERMINATOR: u8 = b'\n';
pub const MAX_STATION_NAME_LEN: usize = 100;

/// Longest legal line: name, delimiter, `-99.9`, terminator
pub const MAX_LINE_LEN: usize = MAX_STATION_NAME_LEN + 1 + 5 + 1;

/// Scanning
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();
pub const DEFAULT_WINDOW_SIZE: usize = 64 * 1024;
pub const MIN_WINDOW_SIZE: usize = 128;
const _: () = assert!(MIN_WINDOW_SIZE >= MAX_LINE_LEN);

/// Aggregation
pub const DEFAULT_SHARD_CAPACITY: usize = 16 * 1024;

/// Worker threads kept free for the orchestrator and the OS
pub const RESERVED_THREADS: usize = 1;

/// File names
pub const DEFAULT_INPUT_FILE: &str = "measurements.txt";

/// Environment variable prefix for layered settings
pub const SETTINGS_ENV_PREFIX: &str = "BRC";

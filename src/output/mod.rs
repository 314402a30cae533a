pub mod progress;
pub mod stats;
pub mod logger;

pub use progress::ProgressDisplay;
pub use stats::{human_readable_size, Stats};
pub use logger::{Logger, init_logger, log, log_with_timestamp, is_logging_enabled};

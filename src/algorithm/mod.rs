pub mod bwlimit;
pub mod clock;

pub use bwlimit::BandwidthLimiter;
pub use clock::{Clock, ManualClock, SystemClock};

pub mod clock;
pub mod paths;

pub use clock::{Clock, SystemClock};

pub mod clock;
pub mod fakes;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock, format_marker_timestamp};
pub use traits::*;
pub use types::*;

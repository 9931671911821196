//! Runtime adapters: time and detached task execution.

mod background;
mod clock;

pub use background::TrackedExecutor;
pub use clock::{FixedClock, SystemClock};

//! Pure stopwatch and lap logic with no platform dependencies.
//! The host supplies the clock and the tick scheduler; tests drive ticks by hand.

mod clock;
mod engine;
pub mod stats;

pub use clock::{Clock, MonotonicClock, Scheduler};
pub use engine::{Command, InvalidTransition, StopwatchEngine, TimerState, TICK_INTERVAL_MS};
pub use stats::{classify, lap_table, split_time, LapMark, LapRow, SplitTime};

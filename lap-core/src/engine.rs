use std::fmt;

use crate::clock::{Clock, Scheduler};

/// Tick cadence that keeps a centisecond display current.
pub const TICK_INTERVAL_MS: u64 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    /// Never started since construction or the last reset.
    Idle,
    Running,
    /// Halted with at least one lap on record.
    Stopped,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    Tick,
    Lap,
    Stop,
    Resume,
    Reset,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Tick => "tick",
            Self::Lap => "lap",
            Self::Stop => "stop",
            Self::Resume => "resume",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// A command was issued from a state it is not valid in. Nothing was changed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InvalidTransition {
    pub command: Command,
    pub state: TimerState,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} while {:?}", self.command, self.state)
    }
}

impl std::error::Error for InvalidTransition {}

/// Stopwatch with lap history.
///
/// The in-progress lap is kept apart from the finalized laps, which are
/// stored oldest-first. [`StopwatchEngine::display_laps`] gives the
/// newest-first view with the in-progress lap at index 0.
///
/// While running the engine holds exactly one subscription from its
/// scheduler; it is dropped on `stop` or when the engine itself is dropped.
pub struct StopwatchEngine<C, S: Scheduler> {
    clock: C,
    scheduler: S,
    ticker: Option<S::Subscription>,
    tick_interval_ms: u64,
    state: TimerState,
    segment_start_ms: u64,
    segment_now_ms: u64,
    current_lap_ms: u64,
    finished_laps: Vec<u64>,
}

impl<C: Clock, S: Scheduler> StopwatchEngine<C, S> {
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            ticker: None,
            tick_interval_ms: TICK_INTERVAL_MS,
            state: TimerState::Idle,
            segment_start_ms: 0,
            segment_now_ms: 0,
            current_lap_ms: 0,
            finished_laps: Vec::new(),
        }
    }

    pub fn with_tick_interval(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms.max(1);
        self
    }

    pub fn start(&mut self) -> Result<(), InvalidTransition> {
        self.require(Command::Start, TimerState::Idle)?;
        let now = self.clock.now_ms();
        self.segment_start_ms = now;
        self.segment_now_ms = now;
        self.current_lap_ms = 0;
        self.finished_laps.clear();
        self.state = TimerState::Running;
        self.arm_ticker();
        Ok(())
    }

    /// Records the time observed by the scheduler. Never touches the laps.
    pub fn on_tick(&mut self, now_ms: u64) -> Result<(), InvalidTransition> {
        self.require(Command::Tick, TimerState::Running)?;
        // Never earlier than the last observed tick (or the segment start).
        self.segment_now_ms = now_ms.max(self.segment_now_ms);
        Ok(())
    }

    /// Closes the in-progress lap and opens a new one. Returns the closed
    /// lap's duration.
    pub fn lap(&mut self) -> Result<u64, InvalidTransition> {
        self.require(Command::Lap, TimerState::Running)?;
        let closed = self.current_lap_ms + self.segment_elapsed_ms();
        self.finished_laps.push(closed);
        self.current_lap_ms = 0;
        let now = self.clock.now_ms();
        self.segment_start_ms = now;
        self.segment_now_ms = now;
        Ok(closed)
    }

    pub fn stop(&mut self) -> Result<(), InvalidTransition> {
        self.require(Command::Stop, TimerState::Running)?;
        self.current_lap_ms += self.segment_elapsed_ms();
        self.segment_start_ms = 0;
        self.segment_now_ms = 0;
        self.state = TimerState::Stopped;
        self.ticker = None;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        self.require(Command::Resume, TimerState::Stopped)?;
        let now = self.clock.now_ms();
        self.segment_start_ms = now;
        self.segment_now_ms = now;
        self.state = TimerState::Running;
        self.arm_ticker();
        Ok(())
    }

    /// Only valid once stopped. Resetting an idle engine is rejected too.
    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        self.require(Command::Reset, TimerState::Stopped)?;
        self.finished_laps.clear();
        self.current_lap_ms = 0;
        self.segment_start_ms = 0;
        self.segment_now_ms = 0;
        self.state = TimerState::Idle;
        Ok(())
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_idle(&self) -> bool {
        self.state == TimerState::Idle
    }

    pub fn total_elapsed(&self) -> u64 {
        self.finished_laps.iter().sum::<u64>() + self.current_lap_ms + self.segment_elapsed_ms()
    }

    /// Live value of the in-progress lap, `None` when idle.
    pub fn current_lap(&self) -> Option<u64> {
        match self.state {
            TimerState::Idle => None,
            _ => Some(self.current_lap_ms + self.segment_elapsed_ms()),
        }
    }

    /// Newest first; index 0 is the in-progress lap at its live value.
    pub fn display_laps(&self) -> Vec<u64> {
        match self.current_lap() {
            Some(current) => std::iter::once(current)
                .chain(self.finished_laps.iter().rev().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Finalized laps, oldest first.
    pub fn finished_laps(&self) -> &[u64] {
        &self.finished_laps
    }

    pub fn lap_count(&self) -> usize {
        match self.state {
            TimerState::Idle => 0,
            _ => self.finished_laps.len() + 1,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// The clock the engine reads; schedulers tick with the same time base.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn segment_elapsed_ms(&self) -> u64 {
        match self.state {
            TimerState::Running => self.segment_now_ms.saturating_sub(self.segment_start_ms),
            _ => 0,
        }
    }

    fn require(&self, command: Command, state: TimerState) -> Result<(), InvalidTransition> {
        if self.state == state {
            Ok(())
        } else {
            Err(InvalidTransition { command, state: self.state })
        }
    }

    fn arm_ticker(&mut self) {
        // Release any stale subscription before taking a new one.
        drop(self.ticker.take());
        self.ticker = Some(self.scheduler.subscribe(self.tick_interval_ms));
    }
}

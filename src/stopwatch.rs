use lap_core::{Clock, InvalidTransition, Scheduler, StopwatchEngine, TimerState};

pub struct StopwatchState<C, S: Scheduler> {
    pub engine: StopwatchEngine<C, S>,
}

impl<C: Clock, S: Scheduler> StopwatchState<C, S> {
    pub fn new(clock: C, scheduler: S, tick_ms: u64) -> Self {
        Self {
            engine: StopwatchEngine::new(clock, scheduler).with_tick_interval(tick_ms),
        }
    }

    /// Start, stop or resume, whichever the current state calls for.
    pub fn toggle(&mut self) -> Result<TimerState, InvalidTransition> {
        match self.engine.state() {
            TimerState::Idle => self.engine.start()?,
            TimerState::Running => self.engine.stop()?,
            TimerState::Stopped => self.engine.resume()?,
        }
        log::debug!("stopwatch now {:?}", self.engine.state());
        Ok(self.engine.state())
    }

    pub fn record_lap(&mut self) -> Result<u64, InvalidTransition> {
        let closed = self.engine.lap()?;
        log::info!("lap {} closed at {} ms", self.engine.finished_laps().len(), closed);
        Ok(closed)
    }

    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        self.engine.reset()?;
        log::info!("stopwatch reset");
        Ok(())
    }

    /// Feeds one pump tick. Returns false for a stale tick that arrived
    /// after the stopwatch stopped.
    pub fn tick(&mut self) -> bool {
        let now = self.engine.clock().now_ms();
        match self.engine.on_tick(now) {
            Ok(()) => true,
            Err(e) => {
                log::trace!("dropping tick: {}", e);
                false
            }
        }
    }
}

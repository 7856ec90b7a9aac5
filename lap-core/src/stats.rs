//! Derived lap values for display. Everything here works on the newest-first
//! lap sequence produced by `StopwatchEngine::display_laps`.

use std::fmt;

/// A duration broken into the parts shown on a stopwatch face.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SplitTime {
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

/// Renders as "MM:SS:CC".
impl fmt::Display for SplitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.hundredths)
    }
}

pub fn split_time(ms: u64) -> SplitTime {
    SplitTime {
        minutes: ms / 60_000,
        seconds: (ms % 60_000) / 1000,
        hundredths: (ms % 1000) / 10,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LapMark {
    pub fastest: bool,
    pub slowest: bool,
}

/// Marks the shortest and longest finalized laps.
///
/// Index 0 is the in-progress lap and is never compared. Nothing is marked
/// until there are at least two finalized laps; every lap sharing the
/// minimum (or maximum) gets the mark.
pub fn classify(laps: &[u64]) -> Vec<LapMark> {
    let mut marks = vec![LapMark::default(); laps.len()];
    let finished = laps.get(1..).unwrap_or(&[]);
    if finished.len() < 2 {
        return marks;
    }

    let (min, max) = finished
        .iter()
        .fold((u64::MAX, u64::MIN), |(lo, hi), &lap| (lo.min(lap), hi.max(lap)));

    for (mark, &lap) in marks[1..].iter_mut().zip(finished) {
        mark.fastest = lap == min;
        mark.slowest = lap == max;
    }
    marks
}

/// One line of the lap list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRow {
    /// Oldest lap is 1, so the in-progress lap has the highest number.
    pub number: usize,
    pub duration_ms: u64,
    pub mark: LapMark,
}

pub fn lap_table(laps: &[u64]) -> Vec<LapRow> {
    classify(laps)
        .into_iter()
        .zip(laps)
        .enumerate()
        .map(|(index, (mark, &duration_ms))| LapRow {
            number: laps.len() - index,
            duration_ms,
            mark,
        })
        .collect()
}

/// Format milliseconds as "HH:MM:SS.cs" (centiseconds)
pub fn format_hms_cs(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
}

use std::io::{self, Write};

use lap_core::stats::format_hms_cs;
use lap_core::{lap_table, split_time, TimerState};

const HOUR_MS: u64 = 3_600_000;

pub const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
     s      Start/Stop/Resume\n\
     l      Record lap (running)\n\
     r      Reset (stopped)\n\
     h      This help\n\
     q      Quit\n";

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[2J\x1b[H")
}

pub fn draw_stopwatch<W: Write>(
    out: &mut W,
    state: TimerState,
    total_ms: u64,
    laps: &[u64],
) -> io::Result<()> {
    clear_screen(out)?;
    writeln!(out, "STOPWATCH")?;
    writeln!(out)?;
    writeln!(out, "  {}", split_time(total_ms))?;
    if total_ms >= HOUR_MS {
        writeln!(out, "  ({})", format_hms_cs(total_ms))?;
    }
    writeln!(out)?;

    for row in lap_table(laps) {
        let tag = match (row.mark.fastest, row.mark.slowest) {
            (true, true) => "  (fastest, slowest)",
            (true, false) => "  (fastest)",
            (false, true) => "  (slowest)",
            (false, false) => "",
        };
        writeln!(out, "Lap {:2}   {}{}", row.number, split_time(row.duration_ms), tag)?;
    }

    writeln!(out)?;
    let nav = match state {
        TimerState::Idle => "s Start   h Help   q Quit",
        TimerState::Running => "l Lap   s Stop",
        TimerState::Stopped => "r Reset   s Resume",
    };
    writeln!(out, "{}", nav)?;
    out.flush()
}

pub fn draw_help<W: Write>(out: &mut W) -> io::Result<()> {
    clear_screen(out)?;
    write!(out, "{}", HELP_TEXT)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(state: TimerState, total_ms: u64, laps: &[u64]) -> String {
        let mut buf = Vec::new();
        draw_stopwatch(&mut buf, state, total_ms, laps).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_draw_idle() {
        let screen = render(TimerState::Idle, 0, &[]);
        assert!(screen.contains("  00:00:00\n"));
        assert!(!screen.contains("Lap"));
        assert!(screen.contains("s Start"));
    }

    #[test]
    fn test_draw_lap_table() {
        let screen = render(TimerState::Stopped, 700, &[100, 400, 200]);
        assert!(screen.contains("  00:00:70\n"));
        assert!(screen.contains("Lap  3   00:00:10\n"));
        assert!(screen.contains("Lap  2   00:00:40  (slowest)\n"));
        assert!(screen.contains("Lap  1   00:00:20  (fastest)\n"));
        assert!(screen.contains("r Reset   s Resume"));

        let lap3 = screen.find("Lap  3").unwrap();
        let lap1 = screen.find("Lap  1").unwrap();
        assert!(lap3 < lap1);
    }

    #[test]
    fn test_draw_tied_laps() {
        let screen = render(TimerState::Running, 600, &[0, 300, 300]);
        assert_eq!(screen.matches("(fastest, slowest)").count(), 2);
    }

    #[test]
    fn test_draw_long_total_shows_hours() {
        let screen = render(TimerState::Running, HOUR_MS + 1_010, &[HOUR_MS + 1_010]);
        assert!(screen.contains("60:01:01"));
        assert!(screen.contains("(01:00:01.01)"));
    }
}

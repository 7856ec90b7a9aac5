mod pump;
mod stopwatch;
mod ui;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Sender};
use std::thread;

use anyhow::Context;
use clap::Parser;
use lap_core::{Clock, MonotonicClock, Scheduler, TimerState};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::pump::{pump_thread, PumpCtl, PumpScheduler};
use crate::stopwatch::StopwatchState;

#[derive(Parser, Debug)]
#[command(version, author, about = "Terminal stopwatch with lap history")]
struct Cli {
    #[arg(
        long = "tick-ms",
        default_value_t = lap_core::TICK_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..=10),
        help = "Refresh cadence while running, in milliseconds."
    )]
    tick_ms: u64,

    #[arg(long = "no-redraw", help = "Only redraw after key presses, not on every tick.")]
    no_redraw: bool,
}

#[derive(Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum AppOp {
    Redraw = 0,
    Rawkeys,
    Pump,
    Quit,
}

/// A message for the main loop: an `AppOp` code and one scalar argument.
#[derive(Debug)]
pub struct Envelope {
    pub op: usize,
    pub arg: u32,
}

impl Envelope {
    pub fn new(op: AppOp, arg: u32) -> Self {
        Self { op: op.to_usize().unwrap_or(usize::MAX), arg }
    }
}

struct LapTimerApp<W, C, S: Scheduler> {
    out: W,
    stopwatch: StopwatchState<C, S>,
    redraw_on_tick: bool,
    help_visible: bool,
}

impl<W: Write, C: Clock, S: Scheduler> LapTimerApp<W, C, S> {
    fn new(out: W, stopwatch: StopwatchState<C, S>, redraw_on_tick: bool) -> Self {
        Self {
            out,
            stopwatch,
            redraw_on_tick,
            help_visible: false,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        if self.help_visible {
            return ui::draw_help(&mut self.out);
        }
        let engine = &self.stopwatch.engine;
        ui::draw_stopwatch(
            &mut self.out,
            engine.state(),
            engine.total_elapsed(),
            &engine.display_laps(),
        )
    }

    /// Each tick repaints the whole screen so the total and the live lap
    /// move together.
    fn handle_pump(&mut self) -> io::Result<()> {
        if self.stopwatch.tick() && self.redraw_on_tick && !self.help_visible {
            self.redraw()?;
        }
        Ok(())
    }

    /// Returns false once the user asked to quit.
    fn handle_key(&mut self, key: char) -> io::Result<bool> {
        if key == 'q' {
            return Ok(false);
        }
        if self.help_visible {
            self.help_visible = false;
            self.redraw()?;
            return Ok(true);
        }

        let outcome = match key {
            's' | '\n' => self.stopwatch.toggle().map(|state| {
                log::info!("stopwatch {:?}", state);
            }),
            'l' => self.stopwatch.record_lap().map(|_| ()),
            'r' => self.stopwatch.reset(),
            'h' => {
                self.help_visible = true;
                Ok(())
            }
            _ => {
                log::debug!("ignoring key {:?}", key);
                return Ok(true);
            }
        };

        if let Err(e) = outcome {
            log::warn!("{}", e);
        }
        self.redraw()?;
        Ok(true)
    }
}

fn key_thread(main: Sender<Envelope>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("can't read stdin: {}", e);
                break;
            }
        };
        // An empty line is a bare Enter.
        let keys: Vec<char> = if line.trim().is_empty() {
            vec!['\n']
        } else {
            line.chars().filter(|c| !c.is_whitespace()).collect()
        };
        for key in keys {
            if main.send(Envelope::new(AppOp::Rawkeys, key as u32)).is_err() {
                return;
            }
        }
    }
    main.send(Envelope::new(AppOp::Quit, 0)).ok();
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("LOG")
        .init();
    let cli = Cli::parse();
    log::info!("laptimer starting, tick every {} ms", cli.tick_ms);

    let (main_tx, main_rx) = channel::<Envelope>();
    let (pump_tx, pump_rx) = channel::<PumpCtl>();

    let pump_main = main_tx.clone();
    let pump = thread::Builder::new()
        .name("pump".into())
        .spawn(move || pump_thread(pump_rx, pump_main))
        .context("can't spawn pump thread")?;

    let key_main = main_tx.clone();
    thread::Builder::new()
        .name("keys".into())
        .spawn(move || key_thread(key_main))
        .context("can't spawn key reader")?;

    let stopwatch = StopwatchState::new(
        MonotonicClock::new(),
        PumpScheduler::new(pump_tx.clone()),
        cli.tick_ms,
    );
    let mut app = LapTimerApp::new(io::stdout(), stopwatch, !cli.no_redraw);
    main_tx.send(Envelope::new(AppOp::Redraw, 0)).ok();
    drop(main_tx);

    for env in main_rx.iter() {
        match FromPrimitive::from_usize(env.op) {
            Some(AppOp::Redraw) => app.redraw()?,
            Some(AppOp::Rawkeys) => {
                let key = char::from_u32(env.arg).unwrap_or('\u{0000}');
                if key != '\u{0000}' && !app.handle_key(key)? {
                    break;
                }
            }
            Some(AppOp::Pump) => app.handle_pump()?,
            Some(AppOp::Quit) => break,
            None => log::error!("unknown opcode: {:?}", env),
        }
    }

    let engine = &app.stopwatch.engine;
    if engine.state() != TimerState::Idle {
        log::info!(
            "final total {} over {} laps",
            lap_core::split_time(engine.total_elapsed()),
            engine.lap_count()
        );
    }

    // Dropping the app releases any live pump subscription.
    drop(app);
    pump_tx.send(PumpCtl::Quit).ok();
    pump.join().map_err(|_| anyhow::anyhow!("pump thread panicked"))?;
    log::info!("laptimer exiting");
    Ok(())
}

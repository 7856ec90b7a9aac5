use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use lap_core::Scheduler;

use crate::{AppOp, Envelope};

pub enum PumpCtl {
    Start(u64),
    Stop,
    Quit,
}

/// Hands out pump subscriptions. Dropping a subscription stops the pump.
pub struct PumpScheduler {
    ctl: Sender<PumpCtl>,
}

pub struct PumpSubscription {
    ctl: Sender<PumpCtl>,
}

impl PumpScheduler {
    pub fn new(ctl: Sender<PumpCtl>) -> Self {
        Self { ctl }
    }
}

impl Scheduler for PumpScheduler {
    type Subscription = PumpSubscription;

    fn subscribe(&mut self, interval_ms: u64) -> PumpSubscription {
        log::debug!("pump start, every {} ms", interval_ms);
        self.ctl.send(PumpCtl::Start(interval_ms)).ok();
        PumpSubscription { ctl: self.ctl.clone() }
    }
}

impl Drop for PumpSubscription {
    fn drop(&mut self) {
        log::debug!("pump stop");
        self.ctl.send(PumpCtl::Stop).ok();
    }
}

pub fn pump_thread(ctl: Receiver<PumpCtl>, main: Sender<Envelope>) {
    let mut interval_ms = lap_core::TICK_INTERVAL_MS;
    let mut running = false;

    loop {
        if running {
            thread::sleep(Duration::from_millis(interval_ms));
            if main.send(Envelope::new(AppOp::Pump, 0)).is_err() {
                break;
            }
        }

        // Non-blocking when running, block-wait when stopped
        let msg = if running {
            match ctl.try_recv() {
                Ok(msg) => Some(msg),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match ctl.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            }
        };

        match msg {
            Some(PumpCtl::Start(ms)) => {
                interval_ms = ms.max(1);
                running = true;
            }
            Some(PumpCtl::Stop) => running = false,
            Some(PumpCtl::Quit) => break,
            None => {}
        }
    }
    log::debug!("pump thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use std::sync::mpsc::channel;

    #[test]
    fn test_subscription_drives_pump() {
        let (ctl_tx, ctl_rx) = channel();
        let (main_tx, main_rx) = channel();
        let handle = thread::spawn(move || pump_thread(ctl_rx, main_tx));

        let mut scheduler = PumpScheduler::new(ctl_tx.clone());
        let sub = scheduler.subscribe(1);
        let env = main_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(AppOp::from_usize(env.op), Some(AppOp::Pump)));

        drop(sub);
        ctl_tx.send(PumpCtl::Quit).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_pump_exits_when_control_closes() {
        let (ctl_tx, ctl_rx) = channel::<PumpCtl>();
        let (main_tx, _main_rx) = channel();
        let handle = thread::spawn(move || pump_thread(ctl_rx, main_tx));
        drop(ctl_tx);
        handle.join().unwrap();
    }
}

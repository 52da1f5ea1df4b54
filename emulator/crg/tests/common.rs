// Licensed under the Apache-2.0 license
#![allow(dead_code)]

use emulator_crg::{CrgConfig, DramPhyInit, HandshakeLines, HandshakePort, Soc, Step};
use log::LevelFilter;
use simple_logger::SimpleLogger;

pub fn setup() {
    // Initialize log level to info (only once)
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();
}

/// Reference design clocks with a short power-on delay and lock time.
pub fn fast_config() -> CrgConfig {
    CrgConfig {
        por_width: 8,
        pll_lock_time_us: 10.0,
        ..Default::default()
    }
}

/// One step together with the stall line as the gate saw it.
pub struct Observed {
    pub stalled: bool,
    pub step: Step,
}

/// Steps `soc` through every edge up to `until`.
pub fn observe<P: DramPhyInit>(soc: &mut Soc<P>, until: u64) -> Vec<Observed> {
    let stop = soc.phy().lines().stop;
    let mut observed = Vec::new();
    while soc.crg().next_edge().is_some_and(|t| t <= until) {
        let stalled = stop.get();
        let Some(step) = soc.step() else {
            break;
        };
        observed.push(Observed { stalled, step });
    }
    observed
}

/// PHY init that finishes training, then raises `stop` for good.
pub struct StuckPhy {
    port: HandshakePort,
    cycle: u64,
    train: u64,
    stick_at: u64,
}

impl StuckPhy {
    pub fn new(train: u64, stick_at: u64) -> Self {
        Self {
            port: HandshakePort::default(),
            cycle: 0,
            train,
            stick_at,
        }
    }
}

impl DramPhyInit for StuckPhy {
    fn clock(&mut self) {
        self.cycle += 1;
        self.port.set_reset(self.cycle < self.train);
        self.port
            .set_stop(self.cycle < self.train || self.cycle >= self.stick_at);
    }

    fn hold_in_reset(&mut self) {
        self.cycle = 0;
        self.port.set_stop(true);
        self.port.set_reset(true);
    }

    fn lines(&self) -> HandshakeLines {
        self.port.lines()
    }
}

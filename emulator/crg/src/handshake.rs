// Licensed under the Apache-2.0 license

//! DRAM PHY initialization handshake.
//!
//! The PHY init logic owns its `stop` and `reset` request lines and drives them
//! as levels: the system clock is held for as long as they stay high, with no
//! timeout.

use crate::signal::{Signal, SignalView};

/// Request lines driven by the PHY init collaborator. Both come up asserted.
#[derive(Debug)]
pub struct HandshakePort {
    stop: Signal<bool>,
    reset: Signal<bool>,
}

impl Default for HandshakePort {
    fn default() -> Self {
        Self {
            stop: Signal::new("phy_stop", true),
            reset: Signal::new("phy_reset", true),
        }
    }
}

impl HandshakePort {
    pub fn set_stop(&mut self, stop: bool) {
        self.stop.set(stop);
    }

    pub fn set_reset(&mut self, reset: bool) {
        self.reset.set(reset);
    }

    pub fn lines(&self) -> HandshakeLines {
        HandshakeLines {
            stop: self.stop.view(),
            reset: self.reset.view(),
        }
    }
}

/// Read side of a [`HandshakePort`].
#[derive(Debug, Clone)]
pub struct HandshakeLines {
    pub stop: SignalView<bool>,
    pub reset: SignalView<bool>,
}

impl HandshakeLines {
    pub fn is_active(&self) -> bool {
        self.stop.get() || self.reset.get()
    }
}

/// A DRAM PHY init block clocked by the `init` domain.
pub trait DramPhyInit {
    /// One `init` clock edge with the domain out of reset.
    fn clock(&mut self);

    /// One `init` clock edge with the domain in reset.
    fn hold_in_reset(&mut self);

    fn lines(&self) -> HandshakeLines;
}

/// A later stall requested by the PHY, in `init` cycles counted from the
/// release of the `init` reset. With `reset` set the PHY also requests the
/// system reset, as when it retrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub at: u64,
    pub len: u64,
    pub reset: bool,
}

impl Calibration {
    fn is_active(&self, cycle: u64) -> bool {
        cycle >= self.at && cycle < self.at + self.len
    }
}

/// Stand-in for the PHY init sequence: holds `stop` and `reset` through
/// training, then optionally stalls the system clock again for calibration.
#[derive(Debug)]
pub struct ScriptedPhyInit {
    port: HandshakePort,
    training_cycles: u64,
    calibrations: Vec<Calibration>,
    cycle: u64,
}

impl ScriptedPhyInit {
    pub fn new(training_cycles: u64) -> Self {
        Self {
            port: HandshakePort::default(),
            training_cycles,
            calibrations: Vec::new(),
            cycle: 0,
        }
    }

    pub fn with_calibration(mut self, at: u64, len: u64) -> Self {
        self.calibrations.push(Calibration {
            at,
            len,
            reset: false,
        });
        self
    }

    /// Stall that also holds the system domain in reset.
    pub fn with_retraining(mut self, at: u64, len: u64) -> Self {
        self.calibrations.push(Calibration {
            at,
            len,
            reset: true,
        });
        self
    }

    pub fn push_calibration(&mut self, calibration: Calibration) {
        self.calibrations.push(calibration);
    }

    /// Init cycles since the `init` reset released.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_trained(&self) -> bool {
        self.cycle >= self.training_cycles
    }
}

impl DramPhyInit for ScriptedPhyInit {
    fn clock(&mut self) {
        self.cycle += 1;
        let training = self.cycle < self.training_cycles;
        let (calibrating, retraining) = self
            .calibrations
            .iter()
            .filter(|c| c.is_active(self.cycle))
            .fold((false, false), |(_, retraining), c| (true, retraining || c.reset));
        if self.cycle == self.training_cycles {
            log::info!("phy: training done after {} cycles", self.cycle);
        }
        self.port.set_reset(training || retraining);
        self.port.set_stop(training || calibrating);
    }

    fn hold_in_reset(&mut self) {
        self.cycle = 0;
        self.port.set_reset(true);
        self.port.set_stop(true);
    }

    fn lines(&self) -> HandshakeLines {
        self.port.lines()
    }
}

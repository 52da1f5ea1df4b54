// Licensed under the Apache-2.0 license

//! DHCEN clock gate and CLKDIV divider between the PLL output and the system
//! clock.

use crate::error::CrgError;
use crate::signal::SignalView;

pub const DIVIDER_RATIOS: [u32; 4] = [2, 4, 5, 8];

/// Dynamic clock gate. An upstream edge passes unless `stall` is high.
#[derive(Debug, Clone)]
pub struct ClockGate {
    stall: SignalView<bool>,
    passed: u64,
    held: u64,
}

impl ClockGate {
    pub fn new(stall: SignalView<bool>) -> Self {
        Self {
            stall,
            passed: 0,
            held: 0,
        }
    }

    /// One upstream edge. Returns true when it reaches the output.
    pub fn clock(&mut self) -> bool {
        if self.stall.get() {
            self.held += 1;
            false
        } else {
            self.passed += 1;
            true
        }
    }

    pub fn is_stalled(&self) -> bool {
        self.stall.get()
    }

    pub fn passed(&self) -> u64 {
        self.passed
    }

    pub fn held(&self) -> u64 {
        self.held
    }
}

/// Integer clock divider.
///
/// The active-high reset is registered on the ungated upstream clock so the
/// divider leaves reset on a known phase even while the gate is closed. The
/// phase is held, not cleared, while the gate is closed.
#[derive(Debug, Clone)]
pub struct ClockDivider {
    ratio: u32,
    phase: u32,
    reset: SignalView<bool>,
    reset_q: bool,
}

impl ClockDivider {
    pub fn new(ratio: u32, reset: SignalView<bool>) -> Result<Self, CrgError> {
        if !DIVIDER_RATIOS.contains(&ratio) {
            Err(CrgError::UnsupportedDividerRatio(ratio))?;
        }
        Ok(Self {
            ratio,
            phase: 0,
            reset,
            reset_q: true,
        })
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn in_reset(&self) -> bool {
        self.reset_q
    }

    /// One ungated upstream edge; `gated` is true when the edge also made it
    /// through the clock gate. Returns true on a divided output edge.
    pub fn clock(&mut self, gated: bool) -> bool {
        let in_reset = self.reset_q;
        self.reset_q = self.reset.get();
        if in_reset {
            self.phase = 0;
            return false;
        }
        if !gated {
            return false;
        }
        self.phase += 1;
        if self.phase == self.ratio {
            self.phase = 0;
            true
        } else {
            false
        }
    }
}

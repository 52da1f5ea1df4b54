/*++

Licensed under the Apache-2.0 license.

File Name:

    pll.rs

Abstract:

    File contains the GW2A PLL parameter solver and its behavioral lock model.

--*/

use crate::error::CrgError;
use crate::signal::{Signal, SignalView};

const IDIV_RANGE: std::ops::RangeInclusive<u32> = 1..=64;
const FBDIV_RANGE: std::ops::RangeInclusive<u32> = 1..=64;
const ODIV_VALUES: [u32; 11] = [2, 4, 8, 16, 32, 48, 64, 80, 96, 112, 128];

const PFD_FREQ_RANGE: (f64, f64) = (3e6, 400e6);
const CLKOUT_FREQ_RANGE: (f64, f64) = (3.125e6, 500e6);
const VCO_FREQ_RANGE: (f64, f64) = (500e6, 1250e6);

fn in_range(freq: f64, (min, max): (f64, f64)) -> bool {
    freq >= min && freq <= max
}

/// Divider settings of one rPLL instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PllConfig {
    pub f_in: f64,
    pub idiv: u32,
    pub fbdiv: u32,
    pub odiv: u32,
}

impl PllConfig {
    /// Finds divider settings producing `f_out` from `f_in`.
    ///
    /// An exact setting wins. Otherwise the setting with the smallest relative
    /// error not above `margin` is returned. Ties keep the first setting found
    /// scanning IDIV, FBDIV then ODIV upwards.
    pub fn solve(f_in: f64, f_out: f64, margin: f64) -> Result<Self, CrgError> {
        let mut best: Option<(f64, PllConfig)> = None;
        for idiv in IDIV_RANGE {
            if !in_range(f_in / idiv as f64, PFD_FREQ_RANGE) {
                continue;
            }
            for fbdiv in FBDIV_RANGE {
                let clkout = f_in * fbdiv as f64 / idiv as f64;
                if !in_range(clkout, CLKOUT_FREQ_RANGE) {
                    continue;
                }
                let error = ((clkout - f_out) / f_out).abs();
                if error > margin {
                    continue;
                }
                let Some(odiv) = ODIV_VALUES
                    .into_iter()
                    .find(|&odiv| in_range(clkout * odiv as f64, VCO_FREQ_RANGE))
                else {
                    continue;
                };
                let config = PllConfig {
                    f_in,
                    idiv,
                    fbdiv,
                    odiv,
                };
                if error < 1e-12 {
                    return Ok(config);
                }
                if best.map_or(true, |(best_error, _)| error < best_error) {
                    best = Some((error, config));
                }
            }
        }
        best.map(|(_, config)| config)
            .ok_or(CrgError::PllUnsolvable {
                input: f_in,
                target: f_out,
                margin,
            })
    }

    pub fn pfd_freq(&self) -> f64 {
        self.f_in / self.idiv as f64
    }

    pub fn clkout_freq(&self) -> f64 {
        self.pfd_freq() * self.fbdiv as f64
    }

    pub fn vco_freq(&self) -> f64 {
        self.clkout_freq() * self.odiv as f64
    }

    pub fn idiv_sel(&self) -> u32 {
        self.idiv - 1
    }

    pub fn fbdiv_sel(&self) -> u32 {
        self.fbdiv - 1
    }

    pub fn odiv_sel(&self) -> u32 {
        self.odiv
    }
}

/// Behavioral rPLL.
///
/// Held in reset while `enable` is low. Once enabled it counts reference
/// cycles and raises `locked` after `lock_ref_cycles` of them. The output
/// clock only exists while locked; scheduling it is up to the caller.
#[derive(Debug)]
pub struct Pll {
    config: PllConfig,
    lock_ref_cycles: u64,
    enabled: bool,
    lock_count: u64,
    inhibit: bool,
    locked: Signal<bool>,
}

impl Pll {
    pub fn new(config: PllConfig, lock_ref_cycles: u64) -> Self {
        Self {
            config,
            lock_ref_cycles: lock_ref_cycles.max(1),
            enabled: false,
            lock_count: 0,
            inhibit: false,
            locked: Signal::new("pll_locked", false),
        }
    }

    pub fn config(&self) -> &PllConfig {
        &self.config
    }

    pub fn lock_ref_cycles(&self) -> u64 {
        self.lock_ref_cycles
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    pub fn locked(&self) -> SignalView<bool> {
        self.locked.view()
    }

    /// Drives the enable input. Disabling resets the PLL.
    pub fn set_enable(&mut self, enable: bool) {
        if enable == self.enabled {
            return;
        }
        self.enabled = enable;
        if !enable {
            self.lock_count = 0;
            self.locked.set(false);
        }
        log::debug!("pll: enable={enable}");
    }

    /// One reference clock edge.
    pub fn tick(&mut self) {
        if !self.enabled || self.inhibit || self.locked.get() {
            return;
        }
        self.lock_count += 1;
        if self.lock_count >= self.lock_ref_cycles {
            self.locked.set(true);
            log::info!(
                "pll: locked at {:.3} MHz after {} reference cycles",
                self.config.clkout_freq() / 1e6,
                self.lock_count
            );
        }
    }

    /// Drops lock. The PLL starts locking again from scratch.
    pub fn lose_lock(&mut self) {
        if self.locked.get() {
            log::warn!("pll: lock lost");
        }
        self.locked.set(false);
        self.lock_count = 0;
    }

    /// Prevents the PLL from ever locking while set.
    pub fn inhibit_lock(&mut self, inhibit: bool) {
        self.inhibit = inhibit;
        if inhibit {
            self.lose_lock();
        }
    }
}

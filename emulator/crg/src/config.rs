// Licensed under the Apache-2.0 license

use crate::clock_gate::DIVIDER_RATIOS;
use crate::error::CrgError;
use crate::pll::PllConfig;
use emulator_consts::{
    PLL_FREQ_MARGIN, PLL_MAX_LOCK_TIME_US, POR_WIDTH, REF_CLK_FREQ, SYS_CLK_DIVIDER,
    SYS_CLK_FREQ,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters of the clock/reset generator. Missing TOML keys take the
/// reference design values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrgConfig {
    pub ref_clk_freq: f64,
    pub sys_clk_freq: f64,
    pub por_width: u32,
    pub divider_ratio: u32,
    pub pll_lock_time_us: f64,
    pub pll_margin: f64,
}

impl Default for CrgConfig {
    fn default() -> Self {
        Self {
            ref_clk_freq: REF_CLK_FREQ,
            sys_clk_freq: SYS_CLK_FREQ,
            por_width: POR_WIDTH,
            divider_ratio: SYS_CLK_DIVIDER,
            pll_lock_time_us: PLL_MAX_LOCK_TIME_US,
            pll_margin: PLL_FREQ_MARGIN,
        }
    }
}

fn check_freq(name: &'static str, value: f64) -> Result<(), CrgError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CrgError::InvalidFrequency { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), CrgError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CrgError::InvalidParameter { name, value })
    }
}

impl CrgConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, CrgError> {
        let config: CrgConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CrgError> {
        let s = fs::read_to_string(path).map_err(|source| CrgError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), CrgError> {
        check_freq("reference clock", self.ref_clk_freq)?;
        check_freq("system clock", self.sys_clk_freq)?;
        check_non_negative("PLL lock time", self.pll_lock_time_us)?;
        check_non_negative("PLL frequency margin", self.pll_margin)?;
        if !(1..=32).contains(&self.por_width) {
            return Err(CrgError::InvalidPorWidth(self.por_width));
        }
        if !DIVIDER_RATIOS.contains(&self.divider_ratio) {
            return Err(CrgError::UnsupportedDividerRatio(self.divider_ratio));
        }
        Ok(())
    }

    /// PLL output frequency, ahead of the system clock divider.
    pub fn pll_clk_freq(&self) -> f64 {
        self.sys_clk_freq * self.divider_ratio as f64
    }

    /// Reference cycles the PLL needs to lock.
    pub fn lock_ref_cycles(&self) -> u64 {
        let cycles = self.pll_lock_time_us * 1e-6 * self.ref_clk_freq;
        (cycles.round() as u64).max(1)
    }

    pub fn solve_pll(&self) -> Result<PllConfig, CrgError> {
        PllConfig::solve(self.ref_clk_freq, self.pll_clk_freq(), self.pll_margin)
    }
}

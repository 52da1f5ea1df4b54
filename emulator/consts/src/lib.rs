/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the reference design constants of the Lychee MSO clock/reset
    generator.

--*/

/// Onboard oscillator (`clk27`).
pub const REF_CLK_FREQ: f64 = 27e6;

/// System clock of the reference SoC.
pub const SYS_CLK_FREQ: f64 = 48e6;

/// Width of the power-on reset counter. The onboard POR is not aware of
/// reprogramming, so the CRG runs its own.
pub const POR_WIDTH: u32 = 16;

/// CLKDIV ratio between `sys2x` and `sys`.
pub const SYS_CLK_DIVIDER: u32 = 2;

/// Maximum GW2A PLL lock time.
pub const PLL_MAX_LOCK_TIME_US: f64 = 200.0;

/// Relative frequency error accepted when solving PLL parameters.
pub const PLL_FREQ_MARGIN: f64 = 1e-2;

/// Init-domain cycles the scripted DRAM PHY spends in training (100 us).
pub const PHY_TRAINING_CYCLES: u64 = 2_700;

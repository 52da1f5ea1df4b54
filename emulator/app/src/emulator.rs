/*++

Licensed under the Apache-2.0 license.

File Name:

    emulator.rs

Abstract:

    File contains the command line and the bring-up scenario runner.

--*/

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_num::maybe_hex;
use emulator_consts::{
    PHY_TRAINING_CYCLES, PLL_FREQ_MARGIN, REF_CLK_FREQ, SYS_CLK_DIVIDER, SYS_CLK_FREQ,
};
use emulator_crg::{
    Calibration, ClockDomain, CrgConfig, DomainState, PllConfig, ScriptedPhyInit, SequencerState,
    Soc, Timebase, Transition,
};
use log::LevelFilter;
use std::fmt;
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Width of the pulse driven by `--manual-reset-at`.
const MANUAL_RESET_PULSE_US: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(version, about = "Lychee MSO clock/reset generator emulator", long_about = None)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the clock/reset bring-up and report the sequencer transitions
    Run(RunArgs),
    /// Solve the PLL for a reference and system clock
    Pll(PllArgs),
    /// Print board pin assignments
    Pins {
        /// Resource name, e.g. `led` or `ddram`
        resource: Option<String>,

        /// Resource number
        #[arg(value_parser=maybe_hex::<u32>)]
        number: Option<u32>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// CRG configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// System clock frequency in Hz
    #[arg(long)]
    pub sys_clk_freq: Option<f64>,

    /// Reference clock frequency in Hz
    #[arg(long)]
    pub ref_clk_freq: Option<f64>,

    /// Init clock cycles the DRAM PHY holds stop/reset for training
    #[arg(long, value_parser=maybe_hex::<u64>, default_value_t = PHY_TRAINING_CYCLES)]
    pub training_cycles: u64,

    /// Later PHY stall as AT:LEN[:reset], in init cycles after the init reset
    /// released; `reset` also holds the system domain in reset
    #[arg(long, value_parser = parse_calibration)]
    pub calibration: Vec<Calibration>,

    /// Force a PLL lock loss at this time (us)
    #[arg(long)]
    pub lock_loss_at: Option<f64>,

    /// Pulse the manual reset at this time (us)
    #[arg(long)]
    pub manual_reset_at: Option<f64>,

    /// Simulated time (us)
    #[arg(long, default_value_t = 5_000.0)]
    pub duration_us: f64,

    /// Run without the reference oscillator
    #[arg(long)]
    pub no_ref_clock: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PllArgs {
    /// Reference clock frequency in Hz
    #[arg(long, default_value_t = REF_CLK_FREQ)]
    pub ref_clk_freq: f64,

    /// System clock frequency in Hz
    #[arg(long, default_value_t = SYS_CLK_FREQ)]
    pub sys_clk_freq: f64,

    /// CLKDIV ratio between the PLL output and the system clock
    #[arg(long, default_value_t = SYS_CLK_DIVIDER)]
    pub divider_ratio: u32,

    /// Accepted relative frequency error
    #[arg(long, default_value_t = PLL_FREQ_MARGIN)]
    pub margin: f64,
}

fn parse_calibration(s: &str) -> Result<Calibration, String> {
    let mut fields = s.split(':').map(str::trim);
    let (Some(at), Some(len)) = (fields.next(), fields.next()) else {
        return Err(format!("expected AT:LEN[:reset], got {s}"));
    };
    let reset = match fields.next() {
        None => false,
        Some("reset") => true,
        Some(other) => return Err(format!("unknown calibration flag {other}")),
    };
    if fields.next().is_some() {
        return Err(format!("expected AT:LEN[:reset], got {s}"));
    }
    Ok(Calibration {
        at: maybe_hex::<u64>(at)?,
        len: maybe_hex::<u64>(len)?,
        reset,
    })
}

impl RunArgs {
    pub fn crg_config(&self) -> Result<CrgConfig> {
        let mut config = match &self.config {
            Some(path) => CrgConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => CrgConfig::default(),
        };
        if let Some(freq) = self.sys_clk_freq {
            config.sys_clk_freq = freq;
        }
        if let Some(freq) = self.ref_clk_freq {
            config.ref_clk_freq = freq;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Injection {
    LockLoss,
    ManualReset(bool),
}

/// Bring-up scenario: the CRG, the scripted PHY init and a list of injected
/// faults.
pub struct Emulator {
    soc: Soc<ScriptedPhyInit>,
    duration: u64,
    injections: Vec<(u64, Injection)>,
}

impl Emulator {
    pub fn from_args(args: &RunArgs) -> Result<Self> {
        let config = args.crg_config()?;
        let mut phy = ScriptedPhyInit::new(args.training_cycles);
        for calibration in &args.calibration {
            phy.push_calibration(*calibration);
        }
        let mut soc = Soc::new(&config, phy)?;
        if args.no_ref_clock {
            soc.crg_mut().set_reference_clock(false);
        }
        if !(args.duration_us.is_finite() && args.duration_us >= 0.0) {
            bail!("invalid duration {} us", args.duration_us);
        }

        let tb = *soc.crg().timebase();
        let mut injections = Vec::new();
        if let Some(at) = args.lock_loss_at {
            injections.push((tb.from_micros(at), Injection::LockLoss));
        }
        if let Some(at) = args.manual_reset_at {
            injections.push((tb.from_micros(at), Injection::ManualReset(true)));
            injections.push((
                tb.from_micros(at + MANUAL_RESET_PULSE_US),
                Injection::ManualReset(false),
            ));
        }
        injections.sort_by_key(|(time, _)| *time);

        log::info!(
            "emulator: {} MHz reference, {} MHz system clock",
            config.ref_clk_freq / 1e6,
            config.sys_clk_freq / 1e6
        );
        Ok(Self {
            soc,
            duration: tb.from_micros(args.duration_us),
            injections,
        })
    }

    pub fn run(mut self) -> Report {
        for (time, injection) in std::mem::take(&mut self.injections) {
            if time > self.duration {
                break;
            }
            self.soc.run_until(time);
            let crg = self.soc.crg_mut();
            match injection {
                Injection::LockLoss => crg.inject_lock_loss(),
                Injection::ManualReset(asserted) => crg.set_manual_reset(asserted),
            }
        }
        self.soc.run_until(self.duration);

        let crg = self.soc.crg();
        let state = crg.state();
        if state != SequencerState::Running {
            log::warn!("emulator: system clock domain not running, held in {state:?}");
        }
        Report {
            timebase: *crg.timebase(),
            pll: *crg.pll().config(),
            transitions: self.soc.transitions().to_vec(),
            domains: ClockDomain::iter().map(|d| (d, crg.domain(d))).collect(),
            state,
            end: crg.now(),
        }
    }
}

/// Outcome of one bring-up run.
#[derive(Debug, Clone)]
pub struct Report {
    pub timebase: Timebase,
    pub pll: PllConfig,
    pub transitions: Vec<Transition>,
    pub domains: Vec<(ClockDomain, DomainState)>,
    pub state: SequencerState,
    pub end: u64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PLL: IDIV={} FBDIV={} ODIV={} -> {:.3} MHz",
            self.pll.idiv,
            self.pll.fbdiv,
            self.pll.odiv,
            self.pll.clkout_freq() / 1e6
        )?;
        writeln!(f, "Transitions:")?;
        for t in &self.transitions {
            writeln!(
                f,
                "  {:>12.3} us  {:?} -> {:?}",
                self.timebase.to_micros(t.time),
                t.from,
                t.to
            )?;
        }
        writeln!(
            f,
            "State at {:.3} us: {:?}",
            self.timebase.to_micros(self.end),
            self.state
        )?;
        writeln!(f, "Domains:")?;
        for (domain, state) in &self.domains {
            writeln!(
                f,
                "  {:<8} {:<8} {:<9} {} edges",
                domain.to_string(),
                state.clock.to_string(),
                if state.reset { "reset" } else { "released" },
                state.edges
            )?;
        }
        Ok(())
    }
}

/// Solved PLL settings for the `pll` command.
pub fn pll_report(args: &PllArgs) -> Result<String> {
    let config = CrgConfig {
        ref_clk_freq: args.ref_clk_freq,
        sys_clk_freq: args.sys_clk_freq,
        divider_ratio: args.divider_ratio,
        pll_margin: args.margin,
        ..Default::default()
    };
    config.validate()?;
    let pll = config.solve_pll()?;
    let sys = pll.clkout_freq() / args.divider_ratio as f64;
    let error = (sys - args.sys_clk_freq) / args.sys_clk_freq * 100.0;
    Ok(format!(
        "IDIV_SEL={} FBDIV_SEL={} ODIV_SEL={}\n\
         PFD {:.3} MHz, VCO {:.3} MHz, CLKOUT {:.3} MHz\n\
         sys {:.3} MHz (CLKDIV {}), error {:+.4}%\n",
        pll.idiv_sel(),
        pll.fbdiv_sel(),
        pll.odiv_sel(),
        pll.pfd_freq() / 1e6,
        pll.vco_freq() / 1e6,
        pll.clkout_freq() / 1e6,
        sys / 1e6,
        args.divider_ratio,
        error
    ))
}

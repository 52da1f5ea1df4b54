/*++

Licensed under the Apache-2.0 license.

File Name:

    crg.rs

Abstract:

    File contains the clock/reset generator of the Lychee MSO SoC.

--*/

use crate::clock_gate::{ClockDivider, ClockGate};
use crate::config::CrgConfig;
use crate::domain::{ClockDomain, ClockStatus, DomainState};
use crate::error::CrgError;
use crate::handshake::HandshakeLines;
use crate::pll::Pll;
use crate::por::PowerOnReset;
use crate::reset_sync::{AsyncResetSynchronizer, ResetSources};
use crate::sequencer::{Sequencer, States, Transition};
use crate::signal::Signal;
use crate::timebase::{EdgeScheduler, Timebase};
use strum::IntoEnumIterator;

/// Everything that happened at one edge instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub time: u64,
    /// Reference clock edge (`por` and `init` domains).
    pub reference: bool,
    /// Ungated PLL edge (`sys2x_i`).
    pub pll: bool,
    /// Gated PLL edge (`sys2x`).
    pub sys2x: bool,
    /// Divided system clock edge.
    pub sys: bool,
    pub transitions: Vec<Transition>,
}

/// Clock/reset generator.
///
/// Within one reference edge the PLL sees the enable value from before the
/// edge, then the power-on timer counts, then the new `power_stable` drives
/// the PLL enable. PLL edges run the gate, the divider and, on divided edges,
/// the sys reset synchronizer. The sequencer evaluates last.
pub struct Crg {
    config: CrgConfig,
    lines: HandshakeLines,
    timebase: Timebase,
    sched: EdgeScheduler,
    por: PowerOnReset,
    pll: Pll,
    gate: ClockGate,
    divider: ClockDivider,
    sys_rst: AsyncResetSynchronizer,
    manual_reset: Signal<bool>,
    sequencer: Sequencer,
    domains: [DomainState; 5],
    pending: Vec<Transition>,
}

impl Crg {
    pub fn new(config: &CrgConfig, lines: HandshakeLines) -> Result<Self, CrgError> {
        config.validate()?;
        let pll_config = config.solve_pll()?;
        let timebase = Timebase::new(config.ref_clk_freq, &pll_config);
        let por = PowerOnReset::new(config.por_width)?;
        let pll = Pll::new(pll_config, config.lock_ref_cycles());
        let sys_rst = AsyncResetSynchronizer::new("sys_rst");
        let sequencer = Sequencer::new(
            lines.clone(),
            por.power_stable(),
            pll.locked(),
            sys_rst.output(),
        );
        let gate = ClockGate::new(sequencer.stall());
        let divider = ClockDivider::new(config.divider_ratio, sequencer.reset())?;
        log::debug!(
            "crg: ref {} units, pll {} units, lock after {} ref cycles",
            timebase.ref_period(),
            timebase.pll_period(),
            pll.lock_ref_cycles()
        );
        let mut crg = Self {
            config: config.clone(),
            lines,
            timebase,
            sched: EdgeScheduler::new(&timebase),
            por,
            pll,
            gate,
            divider,
            sys_rst,
            manual_reset: Signal::new("manual_reset", false),
            sequencer,
            domains: [DomainState::new(true); 5],
            pending: Vec::new(),
        };
        crg.settle();
        Ok(crg)
    }

    pub fn config(&self) -> &CrgConfig {
        &self.config
    }

    pub fn timebase(&self) -> &Timebase {
        &self.timebase
    }

    pub fn pll(&self) -> &Pll {
        &self.pll
    }

    pub fn por(&self) -> &PowerOnReset {
        &self.por
    }

    pub fn gate(&self) -> &ClockGate {
        &self.gate
    }

    pub fn now(&self) -> u64 {
        self.sched.now()
    }

    /// Instant of the next edge, `None` while every clock is stopped.
    pub fn next_edge(&self) -> Option<u64> {
        self.sched.peek()
    }

    pub fn state(&self) -> States {
        self.sequencer.state()
    }

    pub fn domain(&self, domain: ClockDomain) -> DomainState {
        self.domains[domain as usize]
    }

    pub fn power_stable(&self) -> bool {
        self.por.power_stable().get()
    }

    pub fn sys_reset(&self) -> bool {
        self.sys_rst.is_asserted()
    }

    pub fn reset_sources(&self) -> ResetSources {
        self.sys_rst.sources()
    }

    /// Domain resets caused by lock loss or manual reset.
    pub fn domain_resets(&self) -> u32 {
        self.sequencer.domain_resets()
    }

    fn current_sources(&self) -> ResetSources {
        let mut sources = ResetSources::empty();
        sources.set(ResetSources::LOCK_LOSS, !self.pll.is_locked());
        sources.set(ResetSources::MANUAL, self.manual_reset.get());
        sources.set(ResetSources::REQUEST, self.lines.reset.get());
        sources
    }

    fn drive_resets(&mut self) {
        let sources = self.current_sources();
        self.sys_rst.drive(sources);
    }

    /// Propagates asynchronous inputs and lets the sequencer react.
    fn settle(&mut self) {
        self.drive_resets();
        let now = self.sched.now();
        let transitions = self.sequencer.evaluate(now, self.sys_rst.sources());
        self.pending.extend(transitions);
        self.refresh_domains();
    }

    fn refresh_domains(&mut self) {
        let ref_clock = if self.sched.reference.is_running() {
            ClockStatus::Running
        } else {
            ClockStatus::Stopped
        };
        let pll_clock = if self.sched.pll.is_running() {
            ClockStatus::Running
        } else {
            ClockStatus::Stopped
        };
        let gated_clock = match pll_clock {
            ClockStatus::Running if self.gate.is_stalled() => ClockStatus::Gated,
            clock => clock,
        };
        let sys_clock = match gated_clock {
            ClockStatus::Running if self.divider.in_reset() => ClockStatus::Gated,
            clock => clock,
        };
        let unlocked = !self.pll.is_locked();
        for domain in ClockDomain::iter() {
            let (clock, reset) = match domain {
                ClockDomain::Por => (ref_clock, false),
                ClockDomain::Init => (ref_clock, !self.power_stable()),
                ClockDomain::Sys2xI => (pll_clock, unlocked),
                ClockDomain::Sys2x => (gated_clock, unlocked),
                ClockDomain::Sys => (sys_clock, self.sys_rst.is_asserted()),
            };
            let state = &mut self.domains[domain as usize];
            state.clock = clock;
            state.reset = reset;
        }
    }

    fn count(&mut self, domain: ClockDomain) {
        self.domains[domain as usize].edges += 1;
    }

    /// Advances to the next edge instant. Returns `None` when no clock is
    /// running; time does not move in that case.
    pub fn step(&mut self) -> Option<Step> {
        self.drive_resets();
        let edges = self.sched.next()?;
        let mut step = Step {
            time: edges.time,
            reference: edges.reference,
            pll: false,
            sys2x: false,
            sys: false,
            transitions: std::mem::take(&mut self.pending),
        };

        if edges.reference {
            self.count(ClockDomain::Por);
            self.count(ClockDomain::Init);
            let was_locked = self.pll.is_locked();
            self.pll.tick();
            self.por.tick();
            self.pll.set_enable(self.power_stable());
            if !was_locked && self.pll.is_locked() {
                self.sched
                    .pll
                    .start_at(edges.time + self.timebase.pll_period());
            }
            self.drive_resets();
        }

        if edges.pll {
            step.pll = true;
            self.count(ClockDomain::Sys2xI);
            let gated = self.gate.clock();
            if gated {
                step.sys2x = true;
                self.count(ClockDomain::Sys2x);
            }
            if self.divider.clock(gated) {
                step.sys = true;
                self.count(ClockDomain::Sys);
                self.sys_rst.clock();
            }
        }

        self.settle();
        step.transitions.append(&mut self.pending);
        Some(step)
    }

    /// Re-evaluates the current instant after a block clocked on the same edge
    /// changed the handshake lines. Returns the transitions this caused.
    pub fn update_inputs(&mut self) -> Vec<Transition> {
        self.settle();
        std::mem::take(&mut self.pending)
    }

    /// Steps every edge up to and including `until`, then idles to it.
    pub fn run_until(&mut self, until: u64) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while self.next_edge().is_some_and(|t| t <= until) {
            if let Some(step) = self.step() {
                transitions.extend(step.transitions);
            }
        }
        self.sched.idle_until(until);
        transitions.append(&mut self.pending);
        transitions
    }

    /// Drives the board-level manual reset. Assertion reaches the sys domain
    /// immediately.
    pub fn set_manual_reset(&mut self, asserted: bool) {
        if self.manual_reset.get() != asserted {
            log::info!("crg: manual reset {}", if asserted { "on" } else { "off" });
        }
        self.manual_reset.set(asserted);
        self.settle();
    }

    /// Connects or removes the reference oscillator. The PLL cannot hold lock
    /// without it.
    pub fn set_reference_clock(&mut self, present: bool) {
        match (present, self.sched.reference.is_running()) {
            (true, false) => {
                let first = self.sched.now() + self.timebase.ref_period();
                self.sched.reference.start_at(first);
                log::info!("crg: reference clock on");
            }
            (false, true) => {
                self.sched.reference.stop();
                self.drop_lock();
                log::warn!("crg: reference clock lost");
            }
            _ => {}
        }
        self.settle();
    }

    fn drop_lock(&mut self) {
        self.pll.lose_lock();
        self.sched.pll.stop();
    }

    /// Forces the PLL out of lock; it relocks after its lock time.
    pub fn inject_lock_loss(&mut self) {
        self.drop_lock();
        self.settle();
    }

    /// Keeps the PLL from ever locking while set.
    pub fn inhibit_pll_lock(&mut self, inhibit: bool) {
        self.pll.inhibit_lock(inhibit);
        if inhibit {
            self.sched.pll.stop();
        }
        self.settle();
    }

    /// Device-level reset. Every register returns to its power-up value and the
    /// power-on timer starts over; time keeps running.
    pub fn power_cycle(&mut self) -> Result<(), CrgError> {
        let now = self.sched.now();
        let ref_running = self.sched.reference.is_running();
        let transition = self.sequencer.power_cycle(now);
        let mut fresh = Crg::new(&self.config, self.lines.clone())?;
        fresh.sched.idle_until(now);
        fresh.sched.reference.stop();
        if ref_running {
            fresh
                .sched
                .reference
                .start_at(now + fresh.timebase.ref_period());
        }
        fresh.pending = std::mem::take(&mut self.pending);
        fresh.pending.extend(transition);
        *self = fresh;
        self.settle();
        Ok(())
    }
}

// Licensed under the Apache-2.0 license

//! Minimal SoC around the clock/reset generator: the CRG plus the DRAM PHY
//! init block that drives its handshake.

use crate::config::CrgConfig;
use crate::crg::{Crg, Step};
use crate::domain::ClockDomain;
use crate::error::CrgError;
use crate::handshake::{DramPhyInit, ScriptedPhyInit};
use crate::sequencer::{States, Transition};

pub struct Soc<P: DramPhyInit = ScriptedPhyInit> {
    crg: Crg,
    phy: P,
    transitions: Vec<Transition>,
}

impl<P: DramPhyInit> Soc<P> {
    pub fn new(config: &CrgConfig, phy: P) -> Result<Self, CrgError> {
        let crg = Crg::new(config, phy.lines())?;
        Ok(Self {
            crg,
            phy,
            transitions: Vec::new(),
        })
    }

    pub fn crg(&self) -> &Crg {
        &self.crg
    }

    pub fn crg_mut(&mut self) -> &mut Crg {
        &mut self.crg
    }

    pub fn phy(&self) -> &P {
        &self.phy
    }

    pub fn phy_mut(&mut self) -> &mut P {
        &mut self.phy
    }

    /// Sequencer transitions seen so far.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Advances both blocks to the next edge instant. The PHY is clocked by
    /// the `init` domain and sees its reset as registered before the edge.
    /// Its new `stop`/`reset` levels reach the CRG within the same step.
    pub fn step(&mut self) -> Option<Step> {
        let init_in_reset = self.crg.domain(ClockDomain::Init).reset;
        let mut step = self.crg.step()?;
        if step.reference {
            if init_in_reset {
                self.phy.hold_in_reset();
            } else {
                self.phy.clock();
            }
            step.transitions.extend(self.crg.update_inputs());
        }
        self.transitions.extend_from_slice(&step.transitions);
        Some(step)
    }

    /// Runs every edge up to and including `until`, handing each step to
    /// `on_step`.
    pub fn run_until_with(&mut self, until: u64, mut on_step: impl FnMut(&Crg, &Step)) {
        while self.crg.next_edge().is_some_and(|t| t <= until) {
            let Some(step) = self.step() else {
                break;
            };
            on_step(&self.crg, &step);
        }
        // Anything injected while idle still lands in the log.
        let idle = self.crg.run_until(until);
        self.transitions.extend(idle);
    }

    pub fn run_until(&mut self, until: u64) {
        self.run_until_with(until, |_, _| {});
    }

    pub fn run_for_us(&mut self, micros: f64) {
        let until = self.crg.now() + self.crg.timebase().from_micros(micros);
        self.run_until(until);
    }

    /// Runs until the sequencer reaches `state`, giving up after `deadline`.
    pub fn run_until_state(&mut self, state: States, deadline: u64) -> bool {
        while self.crg.state() != state {
            match self.crg.next_edge() {
                Some(t) if t <= deadline => {
                    self.step();
                }
                _ => {
                    self.run_until(deadline);
                    return self.crg.state() == state;
                }
            }
        }
        true
    }

    pub fn power_cycle(&mut self) -> Result<(), CrgError> {
        self.crg.power_cycle()
    }
}

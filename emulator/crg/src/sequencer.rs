// Licensed under the Apache-2.0 license

//! Bring-up sequencer.
//!
//! Routes the PHY init `stop`/`reset` requests onto the clock gate and divider
//! and tracks the bring-up state of the system clock domain.

use crate::handshake::HandshakeLines;
use crate::reset_sync::ResetSources;
use crate::signal::SignalView;
use smlang::statemachine;

statemachine! {
    derive_states: [Clone, Copy, Debug],
    derive_events: [Clone, Debug],
    transitions: {
        // power not stable yet: clock gated, reset asserted
        *Init + PowerStable = PllWait,

        // sys reset released, which needs lock
        PllWait + ResetReleased [pll_locked] = Running,

        // handshake stalls, any number of times
        Running + HandshakeAsserted = Stalled,
        Stalled + HandshakeCleared = Running,

        // lock loss or manual reset takes the domain down again
        Running + DomainReset / on_domain_reset = PllWait,
        Stalled + DomainReset / on_domain_reset = PllWait,

        _ + PowerCycle = Init,
    }
}

/// State machine extended variables.
pub struct Context {
    locked: SignalView<bool>,
    domain_resets: u32,
}

impl StateMachineContext for Context {
    fn pll_locked(&self) -> Result<bool, ()> {
        Ok(self.locked.get())
    }

    fn on_domain_reset(&mut self) -> Result<(), ()> {
        self.domain_resets += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub time: u64,
    pub from: States,
    pub to: States,
}

pub struct Sequencer {
    sm: StateMachine<Context>,
    lines: HandshakeLines,
    power_stable: SignalView<bool>,
    sys_rst: SignalView<bool>,
}

impl Sequencer {
    pub fn new(
        lines: HandshakeLines,
        power_stable: SignalView<bool>,
        locked: SignalView<bool>,
        sys_rst: SignalView<bool>,
    ) -> Self {
        Self {
            sm: StateMachine::new(Context {
                locked,
                domain_resets: 0,
            }),
            lines,
            power_stable,
            sys_rst,
        }
    }

    pub fn state(&self) -> States {
        *self.sm.state()
    }

    /// Stall line for the clock gate. Wired straight to the PHY `stop`.
    pub fn stall(&self) -> SignalView<bool> {
        self.lines.stop.clone()
    }

    /// Reset line for the divider and the reset synchronizer. Wired straight
    /// to the PHY `reset`.
    pub fn reset(&self) -> SignalView<bool> {
        self.lines.reset.clone()
    }

    /// Times the domain was taken down by lock loss or manual reset.
    pub fn domain_resets(&self) -> u32 {
        self.sm.context().domain_resets
    }

    fn next_event(&self, sources: ResetSources) -> Option<Events> {
        let domain_reset = sources.intersects(ResetSources::LOCK_LOSS | ResetSources::MANUAL);
        match self.state() {
            States::Init => self.power_stable.get().then_some(Events::PowerStable),
            States::PllWait => (!self.sys_rst.get()).then_some(Events::ResetReleased),
            States::Running if domain_reset => Some(Events::DomainReset),
            States::Running => self
                .lines
                .is_active()
                .then_some(Events::HandshakeAsserted),
            States::Stalled if domain_reset => Some(Events::DomainReset),
            States::Stalled => (!self.lines.is_active() && !self.sys_rst.get())
                .then_some(Events::HandshakeCleared),
        }
    }

    /// Fires every transition the current inputs allow. `sources` is the
    /// reset source set currently driven into the sys reset synchronizer.
    pub fn evaluate(&mut self, time: u64, sources: ResetSources) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Some(event) = self.next_event(sources) {
            let from = self.state();
            if self.sm.process_event(event).is_err() {
                break;
            }
            let to = self.state();
            log::info!("sequencer: {from:?} -> {to:?}");
            transitions.push(Transition { time, from, to });
        }
        transitions
    }

    pub fn power_cycle(&mut self, time: u64) -> Option<Transition> {
        let from = self.state();
        self.sm.process_event(Events::PowerCycle).ok()?;
        let to = self.state();
        log::info!("sequencer: {from:?} -> {to:?} (power cycle)");
        Some(Transition { time, from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::HandshakePort;
    use crate::signal::Signal;

    struct Bench {
        port: HandshakePort,
        power_stable: Signal<bool>,
        locked: Signal<bool>,
        sys_rst: Signal<bool>,
        seq: Sequencer,
    }

    impl Bench {
        fn new() -> Self {
            let port = HandshakePort::default();
            let power_stable = Signal::new("power_stable", false);
            let locked = Signal::new("locked", false);
            let sys_rst = Signal::new("sys_rst", true);
            let seq = Sequencer::new(
                port.lines(),
                power_stable.view(),
                locked.view(),
                sys_rst.view(),
            );
            Self {
                port,
                power_stable,
                locked,
                sys_rst,
                seq,
            }
        }

        fn states(&mut self, sources: ResetSources) -> Vec<States> {
            self.seq
                .evaluate(0, sources)
                .into_iter()
                .map(|t| t.to)
                .collect()
        }

        fn bring_up(&mut self) {
            self.power_stable.set(true);
            self.locked.set(true);
            self.port.set_stop(false);
            self.port.set_reset(false);
            self.sys_rst.set(false);
            assert_eq!(
                self.states(ResetSources::empty()),
                [States::PllWait, States::Running]
            );
        }
    }

    #[test]
    fn test_holds_in_init() {
        let mut bench = Bench::new();
        assert!(bench.states(ResetSources::all()).is_empty());
        assert_eq!(bench.seq.state(), States::Init);
    }

    #[test]
    fn test_waits_for_lock() {
        let mut bench = Bench::new();
        bench.power_stable.set(true);
        assert_eq!(bench.states(ResetSources::all()), [States::PllWait]);
        // Released reset without lock does not count.
        bench.sys_rst.set(false);
        assert!(bench.states(ResetSources::empty()).is_empty());
        bench.port.set_stop(false);
        bench.port.set_reset(false);
        bench.locked.set(true);
        assert_eq!(bench.states(ResetSources::empty()), [States::Running]);
    }

    #[test]
    fn test_lock_with_phy_busy_stalls() {
        let mut bench = Bench::new();
        bench.power_stable.set(true);
        bench.sys_rst.set(false);
        bench.locked.set(true);
        // Power-up levels on the PHY lines stall the domain right away.
        assert_eq!(
            bench.states(ResetSources::empty()),
            [States::PllWait, States::Running, States::Stalled]
        );
    }

    #[test]
    fn test_stall_lines_are_the_phy_lines() {
        let mut bench = Bench::new();
        let stall = bench.seq.stall();
        let reset = bench.seq.reset();
        bench.port.set_stop(false);
        assert!(!stall.get());
        assert!(reset.get());
        bench.port.set_reset(false);
        assert!(!reset.get());
        bench.port.set_stop(true);
        assert!(stall.get());
    }

    #[test]
    fn test_repeated_stalls() {
        let mut bench = Bench::new();
        bench.bring_up();
        for _ in 0..3 {
            bench.port.set_stop(true);
            assert_eq!(bench.states(ResetSources::empty()), [States::Stalled]);
            assert!(bench.states(ResetSources::empty()).is_empty());
            bench.port.set_stop(false);
            assert_eq!(bench.states(ResetSources::empty()), [States::Running]);
        }
    }

    #[test]
    fn test_handshake_reset_waits_for_release() {
        let mut bench = Bench::new();
        bench.bring_up();
        bench.port.set_reset(true);
        bench.sys_rst.set(true);
        assert_eq!(bench.states(ResetSources::REQUEST), [States::Stalled]);
        bench.port.set_reset(false);
        assert!(bench.states(ResetSources::empty()).is_empty());
        bench.sys_rst.set(false);
        assert_eq!(bench.states(ResetSources::empty()), [States::Running]);
    }

    #[test]
    fn test_lock_loss_returns_to_pll_wait() {
        let mut bench = Bench::new();
        bench.bring_up();
        bench.locked.set(false);
        bench.sys_rst.set(true);
        assert_eq!(bench.states(ResetSources::LOCK_LOSS), [States::PllWait]);
        assert_eq!(bench.seq.domain_resets(), 1);

        bench.port.set_stop(true);
        bench.locked.set(true);
        bench.sys_rst.set(false);
        assert_eq!(
            bench.states(ResetSources::empty()),
            [States::Running, States::Stalled]
        );
    }

    #[test]
    fn test_power_cycle() {
        let mut bench = Bench::new();
        bench.bring_up();
        let t = bench.seq.power_cycle(42).unwrap();
        assert_eq!((t.time, t.from, t.to), (42, States::Running, States::Init));
        assert_eq!(bench.seq.state(), States::Init);
    }
}

// Licensed under the Apache-2.0 license

#[cfg(test)]
mod common;

use common::{fast_config, observe, setup, StuckPhy};
use emulator_crg::{
    ClockDomain, ClockStatus, DramPhyInit, ResetSources, ScriptedPhyInit, SequencerState, Soc,
};

#[test]
fn test_no_reference_clock_holds_init() {
    setup();
    let mut soc = Soc::new(&fast_config(), ScriptedPhyInit::new(10)).unwrap();
    soc.crg_mut().set_reference_clock(false);
    soc.run_for_us(1_000.0);

    let crg = soc.crg();
    assert_eq!(crg.state(), SequencerState::Init);
    assert!(!crg.power_stable());
    assert!(crg.sys_reset());
    assert!(crg.domain(ClockDomain::Init).reset);
    assert_eq!(crg.domain(ClockDomain::Por).clock, ClockStatus::Stopped);
    assert_eq!(crg.domain(ClockDomain::Sys).clock, ClockStatus::Stopped);
    assert_eq!(crg.now(), crg.timebase().from_micros(1_000.0));
    assert!(soc.transitions().is_empty());
    assert!(soc.phy().lines().is_active());
}

#[test]
fn test_late_reference_clock() {
    let mut soc = Soc::new(&fast_config(), ScriptedPhyInit::new(10)).unwrap();
    soc.crg_mut().set_reference_clock(false);
    soc.run_for_us(100.0);
    soc.crg_mut().set_reference_clock(true);
    let deadline = soc.crg().now() + soc.crg().timebase().from_micros(100.0);
    assert!(soc.run_until_state(SequencerState::Running, deadline));
    // Power-on delay counts from the first reference edge.
    let tb = *soc.crg().timebase();
    assert_eq!(
        soc.transitions()[0].time,
        tb.from_micros(100.0) + tb.ref_cycles(255)
    );
}

#[test]
fn test_pll_never_locks_holds_pll_wait() {
    setup();
    let mut soc = Soc::new(&fast_config(), ScriptedPhyInit::new(10)).unwrap();
    soc.crg_mut().inhibit_pll_lock(true);
    soc.run_for_us(500.0);

    let crg = soc.crg();
    assert_eq!(crg.state(), SequencerState::PllWait);
    assert!(crg.power_stable());
    assert!(crg.pll().is_enabled());
    assert!(!crg.pll().is_locked());
    assert!(crg.sys_reset());
    assert_eq!(crg.reset_sources(), ResetSources::LOCK_LOSS);
    assert_eq!(crg.domain(ClockDomain::Sys2xI).clock, ClockStatus::Stopped);
    assert_eq!(crg.domain(ClockDomain::Sys).edges, 0);
    // The init domain still runs, so the PHY finished its part.
    assert!(soc.phy().is_trained());
}

#[test]
fn test_stall_never_clears_holds_stalled() {
    setup();
    let mut soc = Soc::new(&fast_config(), StuckPhy::new(50, 400)).unwrap();
    let tb = *soc.crg().timebase();
    assert!(soc.run_until_state(SequencerState::Running, tb.ref_cycles(1_000)));

    let until = soc.crg().now() + tb.from_micros(500.0);
    let steps = observe(&mut soc, until);
    let crg = soc.crg();
    assert_eq!(crg.state(), SequencerState::Stalled);
    assert!(crg.pll().is_locked());
    assert!(!crg.sys_reset());
    assert_eq!(crg.domain(ClockDomain::Sys2x).clock, ClockStatus::Gated);

    let stuck = steps.iter().position(|o| o.stalled).unwrap();
    assert!(steps[stuck..].iter().all(|o| !o.step.sys && !o.step.sys2x));
    assert!(steps[stuck..].iter().any(|o| o.step.pll));
}

#[test]
fn test_lock_loss_recovers() {
    setup();
    let mut soc = Soc::new(&fast_config(), ScriptedPhyInit::new(10)).unwrap();
    let tb = *soc.crg().timebase();
    assert!(soc.run_until_state(SequencerState::Running, tb.ref_cycles(1_000)));

    soc.crg_mut().inject_lock_loss();
    assert!(soc.crg().sys_reset());
    assert_eq!(soc.crg().state(), SequencerState::PllWait);

    let lost_at = soc.crg().now();
    let deadline = lost_at + tb.ref_cycles(1_000);
    assert!(soc.run_until_state(SequencerState::Running, deadline));
    // Relocking takes the full lock time again.
    let lock_cycles = fast_config().lock_ref_cycles();
    assert!(soc.crg().now() - lost_at >= tb.ref_cycles(lock_cycles - 1));
    assert_eq!(soc.crg().domain_resets(), 1);
}

#[test]
fn test_manual_reset_pulse() {
    let mut soc = Soc::new(&fast_config(), ScriptedPhyInit::new(10)).unwrap();
    let tb = *soc.crg().timebase();
    assert!(soc.run_until_state(SequencerState::Running, tb.ref_cycles(1_000)));

    soc.crg_mut().set_manual_reset(true);
    assert!(soc.crg().sys_reset());
    assert_eq!(soc.crg().reset_sources(), ResetSources::MANUAL);
    soc.run_for_us(1.0);
    assert!(soc.crg().sys_reset());
    assert_eq!(soc.crg().state(), SequencerState::PllWait);

    soc.crg_mut().set_manual_reset(false);
    let until = soc.crg().now() + tb.ref_cycles(4);
    let steps = observe(&mut soc, until);
    let sys_edges: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, o)| o.step.sys)
        .map(|(i, _)| i)
        .collect();
    let released = steps
        .iter()
        .position(|o| {
            o.step
                .transitions
                .iter()
                .any(|t| t.to == SequencerState::Running)
        })
        .unwrap();
    // Released on the second sys edge after the manual reset cleared.
    assert_eq!(released, sys_edges[1]);
}
